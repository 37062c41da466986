use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        let path = self.path().to_path_buf();
        let root_oid = self.store_mut().initialize_tree(&path)?.oid().clone();

        writeln!(self.writer(), "{root_oid}")?;

        Ok(())
    }
}
