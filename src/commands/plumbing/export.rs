use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, CommitData};
use std::io::Write;

impl Repository {
    /// Snapshot the directory, optionally commit it, and print every object
    pub fn export(&mut self, message: Option<&str>) -> anyhow::Result<()> {
        let path = self.path().to_path_buf();
        self.store_mut().initialize_tree(&path)?;

        if let Some(message) = message {
            let author = Author::load_from_env()?;
            let data = CommitData::new(author.clone(), author, message.trim().to_string());
            self.store_mut().add_commit(data)?;
        }

        let snapshot = serde_json::to_string_pretty(&self.store().snapshot())?;
        writeln!(self.writer(), "{snapshot}")?;

        Ok(())
    }
}
