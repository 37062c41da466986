use crate::areas::database::ObjectStore;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::hash_object::DigestAlgorithm;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// A directory being snapshotted, its object store and the command output sink
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    store: ObjectStore,
    workspace: Workspace,
}

impl Repository {
    pub fn new(
        path: &str,
        algorithm: DigestAlgorithm,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;

        let mut store = ObjectStore::with_algorithm(algorithm);
        store.initialize(&path);
        let workspace = Workspace::new(&path);

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            store,
            workspace,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }
}
