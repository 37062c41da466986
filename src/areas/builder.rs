use crate::areas::database::ObjectStore;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::ROOT_PATH;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use std::path::Path;

/// Builds trees bottom-up from the files under the store's repository root
pub struct TreeBuilder<'s> {
    store: &'s mut ObjectStore,
}

impl<'s> TreeBuilder<'s> {
    pub fn new(store: &'s mut ObjectStore) -> Self {
        TreeBuilder { store }
    }

    /// Snapshot the directory at `relative_dir`
    ///
    /// Files become index entries and subdirectories nested trees, visited in
    /// name order with `.git` skipped. With `is_root` the tree is named `"."`
    /// and installed as the store's root.
    pub fn build(&mut self, relative_dir: &Path, is_root: bool) -> Result<Tree> {
        let workspace = Workspace::new(self.store.repo_path());
        if !workspace.is_dir(relative_dir)? {
            return Err(Error::NotADirectory {
                path: workspace.resolve(relative_dir),
            });
        }

        let tree_path = if is_root {
            ROOT_PATH.to_string()
        } else {
            relative_dir.to_string_lossy().into_owned()
        };
        let mut tree = Tree::create(tree_path, self.store.algorithm())?;

        for child in workspace.list_dir(relative_dir)? {
            let child_path = join_relative(relative_dir, &child.name);

            if child.is_dir {
                let subtree = self.build(Path::new(&child_path), false)?;
                tree.add_tree(self.store, subtree)?;
            } else {
                tree.add_index_entry(self.store, &child_path)?;
            }
        }

        self.store.store_object(&tree);
        tracing::debug!(path = %tree.path(), tree = %tree.oid(), entries = tree.len(), "built tree");

        if is_root {
            self.store.set_root(tree.clone());
        }

        Ok(tree)
    }
}

/// Path of `name` relative to the repository root, `/`-separated
fn join_relative(dir: &Path, name: &str) -> String {
    if dir.as_os_str().is_empty() || dir == Path::new(ROOT_PATH) {
        name.to_string()
    } else {
        format!("{}/{}", dir.to_string_lossy(), name)
    }
}
