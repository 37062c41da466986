use crate::areas::database::CommitOutcome;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, CommitData};
use std::io::Write;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let path = self.path().to_path_buf();
        let author = Author::load_from_env()?;
        let data = CommitData::new(author.clone(), author, message.trim().to_string());

        let outcome = self.store_mut().initialize_tree_and_commit(&path, data)?;
        let commit = self
            .store()
            .commits()
            .last()
            .ok_or_else(|| anyhow::anyhow!("No commit was recorded"))?;

        let is_root = match commit.parent() {
            Some(_) => "",
            None => "(root-commit) ",
        };
        let status = match outcome {
            CommitOutcome::Created(_) => "",
            CommitOutcome::Unchanged(_) => " (tree unchanged)",
        };

        writeln!(
            self.writer(),
            "[{}{}] {}{}",
            is_root,
            outcome.oid().to_short_oid(),
            commit.short_message(),
            status
        )?;

        Ok(())
    }
}
