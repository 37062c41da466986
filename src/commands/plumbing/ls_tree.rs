use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;

impl Repository {
    pub fn ls_tree(&mut self) -> anyhow::Result<()> {
        let path = self.path().to_path_buf();
        let listing = self.store_mut().initialize_tree(&path)?.display();

        if !listing.is_empty() {
            writeln!(self.writer(), "{listing}")?;
        }

        Ok(())
    }
}
