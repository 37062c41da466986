use crate::areas::repository::Repository;
use crate::artifacts::objects::hash_object::hash_object;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub fn hash_object(&mut self, object_path: &str) -> anyhow::Result<()> {
        let object_data = self.workspace().read_file(Path::new(object_path))?;

        let hashed = hash_object(Some(&object_data), ObjectType::Blob, self.store().algorithm())?;

        writeln!(self.writer(), "{}", hashed.oid)?;

        Ok(())
    }
}
