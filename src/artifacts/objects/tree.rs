//! Tree object
//!
//! A tree is a directory snapshot serialized in the index buffer layout:
//!
//! ```text
//! "DIRC" | version 2 | child count
//! child buffers, sorted byte-wise by path, concatenated
//! ```
//!
//! A file child is written as its own index entry. A directory child is written
//! as a directory entry: an index entry with mode `040000` whose object ID is
//! the subtree's hash. Subtree buffers live in the object store under that hash,
//! so decoding resolves directories through the store rather than inline.
//!
//! Every mutation re-sorts the children, re-serializes the whole tree and
//! registers the new buffer in the store. Old hashes stay retrievable.

use crate::areas::database::ObjectStore;
use crate::artifacts::index::HEADER_SIZE;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::objects::ROOT_PATH;
use crate::artifacts::objects::hash_object::{DigestAlgorithm, hash_object};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::{Bytes, BytesMut};

/// A child of a tree: a tracked file or a nested directory
#[derive(Debug, Clone)]
pub enum TreeChild {
    File(IndexEntry),
    Directory(Tree),
}

impl TreeChild {
    pub fn path(&self) -> &str {
        match self {
            TreeChild::File(entry) => entry.path(),
            TreeChild::Directory(tree) => tree.path(),
        }
    }

    pub fn oid(&self) -> &ObjectId {
        match self {
            TreeChild::File(entry) => entry.oid(),
            TreeChild::Directory(tree) => tree.oid(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            TreeChild::File(_) => ObjectType::Blob,
            TreeChild::Directory(_) => ObjectType::Tree,
        }
    }

    pub fn mode(&self) -> EntryMode {
        match self {
            TreeChild::File(entry) => entry.mode(),
            TreeChild::Directory(_) => EntryMode::Directory,
        }
    }

    /// The span this child occupies in its parent's buffer
    fn encode(&self) -> Result<Bytes> {
        match self {
            TreeChild::File(entry) => Ok(entry.buffer().clone()),
            TreeChild::Directory(tree) => {
                let entry = IndexEntry::directory(tree.path(), tree.oid().clone())?;
                Ok(entry.buffer().clone())
            }
        }
    }
}

/// Directory snapshot
#[derive(Debug, Clone)]
pub struct Tree {
    path: String,
    algorithm: DigestAlgorithm,
    header: IndexHeader,
    children: Vec<TreeChild>,
    buffer: Bytes,
    oid: ObjectId,
}

impl Tree {
    /// Empty tree for the directory at `path` (`"."` for the root)
    pub fn create(path: impl Into<String>, algorithm: DigestAlgorithm) -> Result<Self> {
        let mut tree = Tree {
            path: path.into(),
            algorithm,
            header: IndexHeader::with_count(0),
            children: Vec::new(),
            buffer: Bytes::new(),
            oid: ObjectId::default(),
        };
        tree.serialize()?;

        Ok(tree)
    }

    /// Decode a tree buffer, resolving blobs and subtrees through `store`
    pub fn from_buffer(store: &ObjectStore, buffer: Bytes, path: impl Into<String>) -> Result<Self> {
        let mut tree = Tree {
            path: path.into(),
            algorithm: store.algorithm(),
            header: IndexHeader::with_count(0),
            children: Vec::new(),
            buffer,
            oid: ObjectId::default(),
        };
        tree.deserialize(store)?;

        Ok(tree)
    }

    /// Rebuild the children from the current buffer
    ///
    /// Every file entry must have its blob in the store, and every directory
    /// entry its tree buffer; otherwise decoding fails with
    /// [`Error::MissingObject`]. Returns the number of children decoded.
    pub fn deserialize(&mut self, store: &ObjectStore) -> Result<usize> {
        let header = IndexHeader::deserialize(&self.buffer)?;
        let mut remainder = self.buffer.slice(HEADER_SIZE..);
        let mut children = Vec::new();

        for _ in 0..header.entries_count() {
            let (mut entry, rest) = IndexEntry::parse(remainder, self.algorithm)?;
            remainder = rest;

            let stored = store.load(entry.oid())?;
            if entry.is_directory() {
                if stored.object_type != ObjectType::Tree {
                    return Err(Error::corrupt_object(format!(
                        "{} is a {}, expected a tree",
                        entry.oid(),
                        stored.object_type
                    )));
                }

                let subtree = Tree::from_buffer(store, stored.data.clone(), entry.path())?;
                children.push(TreeChild::Directory(subtree));
            } else {
                entry.attach_compressed(stored.data.clone());
                children.push(TreeChild::File(entry));
            }
        }

        if !remainder.is_empty() {
            tracing::trace!(path = %self.path, trailing = remainder.len(), "ignoring trailing bytes");
        }

        self.header = header;
        self.children = children;
        self.oid = hash_object(Some(&self.buffer), ObjectType::Tree, self.algorithm)?.oid;

        Ok(self.children.len())
    }

    /// Rebuild the buffer and hash from the current children
    pub fn serialize(&mut self) -> Result<()> {
        self.header = IndexHeader::with_count(self.children.len() as u32);

        let mut tree_bytes = BytesMut::new();
        tree_bytes.extend_from_slice(&self.header.serialize()?);
        for child in &self.children {
            tree_bytes.extend_from_slice(&child.encode()?);
        }

        self.buffer = tree_bytes.freeze();
        self.oid = hash_object(Some(&self.buffer), ObjectType::Tree, self.algorithm)?.oid;

        Ok(())
    }

    /// Track the file at `path` (relative to the store's repository root)
    ///
    /// An existing entry for the same path is refreshed from disk instead of
    /// being duplicated. The blob and the updated tree are written to `store`.
    pub fn add_index_entry(&mut self, store: &mut ObjectStore, path: &str) -> Result<&IndexEntry> {
        let repo_path = store.repo_path().to_path_buf();

        match self.position(path) {
            Some(index) => match &mut self.children[index] {
                TreeChild::File(entry) => entry.refresh(&repo_path, self.algorithm)?,
                TreeChild::Directory(_) => {
                    return Err(Error::schema(format!(
                        "{path} is already tracked as a directory"
                    )));
                }
            },
            None => {
                let entry = IndexEntry::create(&repo_path, path, self.algorithm)?;
                self.children.push(TreeChild::File(entry));
            }
        }

        self.sort_children()?;
        self.serialize()?;

        let entry = self
            .file_entry(path)
            .ok_or_else(|| Error::schema(format!("{path} vanished from tree {}", self.path)))?;
        let compressed = entry
            .compressed()
            .cloned()
            .ok_or_else(|| Error::corrupt_object(format!("No content attached to {path}")))?;

        store.store(entry.oid().clone(), ObjectType::Blob, compressed);
        store.store_object(&*self);

        Ok(entry)
    }

    /// Nest `subtree` under this tree
    ///
    /// Fails if the subtree, or any existing child, is a root tree, or if the
    /// subtree has this tree's own path. A child already present at the
    /// subtree's path is kept as is.
    pub fn add_tree(&mut self, store: &mut ObjectStore, subtree: Tree) -> Result<()> {
        if subtree.path == ROOT_PATH || self.position(ROOT_PATH).is_some() {
            return Err(Error::schema("Cannot have root as a child"));
        }
        if subtree.path == self.path {
            return Err(Error::schema(format!(
                "Cannot add tree {} as its own child",
                self.path
            )));
        }

        store.store_object(&subtree);

        if self.position(subtree.path()).is_none() {
            self.children.push(TreeChild::Directory(subtree));
        }

        self.sort_children()?;
        self.serialize()?;
        store.store_object(&*self);

        Ok(())
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.children.iter().position(|child| child.path() == path)
    }

    /// Byte-wise (memcmp) order on paths, no locale, no separator special-casing
    fn sort_children(&mut self) -> Result<()> {
        if self.children.iter().any(|child| child.path() == ROOT_PATH) {
            return Err(Error::schema("Cannot have root as a child"));
        }

        self.children
            .sort_by(|a, b| a.path().as_bytes().cmp(b.path().as_bytes()));

        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    pub fn children(&self) -> &[TreeChild] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    pub fn entry(&self, path: &str) -> Option<&TreeChild> {
        self.position(path).map(|index| &self.children[index])
    }

    pub fn file_entry(&self, path: &str) -> Option<&IndexEntry> {
        match self.entry(path) {
            Some(TreeChild::File(entry)) => Some(entry),
            _ => None,
        }
    }

    pub fn subtree(&self, path: &str) -> Option<&Tree> {
        match self.entry(path) {
            Some(TreeChild::Directory(tree)) => Some(tree),
            _ => None,
        }
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn oid(&self) -> &ObjectId {
        &self.oid
    }

    fn stored_data(&self) -> Bytes {
        self.buffer.clone()
    }

    fn display(&self) -> String {
        self.children
            .iter()
            .map(|child| {
                format!(
                    "{} {} {}\t{}",
                    child.mode().as_str(),
                    child.object_type().as_str(),
                    child.oid(),
                    child.path()
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
