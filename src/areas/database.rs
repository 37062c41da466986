//! In-memory object store
//!
//! Objects are keyed by their hex digest. Blobs are kept zlib-deflated, trees
//! as their index-layout buffer, commits as their text. Writing a key twice
//! keeps the last value.
//!
//! Besides the objects, the store tracks the repository root it scans, the
//! last built root tree and the commit chain built on top of it.

use crate::areas::builder::TreeBuilder;
use crate::artifacts::core::decompress;
use crate::artifacts::objects::commit::{Commit, CommitData};
use crate::artifacts::objects::hash_object::DigestAlgorithm;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use bytes::Bytes;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A value recorded in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub object_type: ObjectType,
}

/// Exported form of a stored object, data hex-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRecord {
    pub key: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    #[serde(serialize_with = "serialize_hex")]
    pub data: Bytes,
}

/// Every object plus the latest commit hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub refs: Vec<ObjectRecord>,
    #[serde(rename = "indexHash")]
    pub index_hash: Option<String>,
}

fn serialize_hex<S: Serializer>(data: &Bytes, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(data))
}

/// Result of [`ObjectStore::add_commit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was appended to the chain
    Created(ObjectId),
    /// The root tree matches the tip's tree; the tip is kept
    Unchanged(ObjectId),
}

impl CommitOutcome {
    pub fn oid(&self) -> &ObjectId {
        match self {
            CommitOutcome::Created(oid) | CommitOutcome::Unchanged(oid) => oid,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CommitOutcome::Created(_))
    }
}

#[derive(Debug, Default)]
pub struct ObjectStore {
    algorithm: DigestAlgorithm,
    objects: BTreeMap<ObjectId, StoredObject>,
    repo_path: PathBuf,
    root: Option<Tree>,
    commits: Vec<Commit>,
    index_commit_hash: Option<ObjectId>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(algorithm: DigestAlgorithm) -> Self {
        ObjectStore {
            algorithm,
            ..Default::default()
        }
    }

    /// Point the store at a repository root
    pub fn initialize(&mut self, repo_path: impl AsRef<Path>) {
        self.repo_path = repo_path.as_ref().to_path_buf();
        tracing::debug!(repo_path = %self.repo_path.display(), "initialized object store");
    }

    /// Scan the whole repository and install the resulting root tree
    pub fn initialize_tree(&mut self, repo_path: impl AsRef<Path>) -> Result<&Tree> {
        self.initialize(repo_path);
        TreeBuilder::new(self).build(Path::new("."), true)?;

        self.root()
            .ok_or_else(|| Error::schema("Tree build did not produce a root"))
    }

    /// Scan the repository, then commit the root tree
    pub fn initialize_tree_and_commit(
        &mut self,
        repo_path: impl AsRef<Path>,
        data: CommitData,
    ) -> Result<CommitOutcome> {
        self.initialize_tree(repo_path)?;
        self.add_commit(data)
    }

    /// Commit the current root tree
    ///
    /// The first commit is always created. Later ones are only created when the
    /// root tree differs from the tip's tree, with the tip as parent.
    /// `index_commit_hash` points at the tip afterwards in both cases.
    pub fn add_commit(&mut self, data: CommitData) -> Result<CommitOutcome> {
        let root_oid = self
            .root
            .as_ref()
            .map(|root| root.oid().clone())
            .ok_or_else(|| Error::schema("No root tree to commit"))?;

        let tip = match self.commits.last() {
            Some(commit) => {
                let fields = commit.fields()?;
                Some((commit.oid().clone(), fields.tree().map(str::to_string)))
            }
            None => None,
        };

        let outcome = match tip {
            Some((tip_oid, Some(tip_tree))) if tip_tree == root_oid.as_ref() => {
                tracing::debug!(tree = %root_oid, tip = %tip_oid, "tree unchanged, keeping tip");
                CommitOutcome::Unchanged(tip_oid)
            }
            tip => {
                let parent = tip.map(|(tip_oid, _)| tip_oid);
                let commit = Commit::create(
                    self,
                    root_oid,
                    parent,
                    data.author,
                    data.committer,
                    data.message,
                )?;
                tracing::debug!(commit = %commit.oid(), tree = %commit.tree_oid(), "created commit");

                let oid = commit.oid().clone();
                self.commits.push(commit);
                CommitOutcome::Created(oid)
            }
        };

        self.index_commit_hash = Some(outcome.oid().clone());

        Ok(outcome)
    }

    pub fn store(&mut self, oid: ObjectId, object_type: ObjectType, data: Bytes) {
        tracing::trace!(%oid, %object_type, size = data.len(), "storing object");
        self.objects.insert(oid, StoredObject { data, object_type });
    }

    pub fn store_object(&mut self, object: &impl Object) {
        self.store(object.oid().clone(), object.object_type(), object.stored_data());
    }

    pub fn load(&self, oid: &ObjectId) -> Result<&StoredObject> {
        self.objects.get(oid).ok_or_else(|| Error::missing_object(oid))
    }

    /// Inflated content of a stored blob
    pub fn load_blob_data(&self, oid: &ObjectId) -> Result<Bytes> {
        let stored = self.load(oid)?;
        if stored.object_type != ObjectType::Blob {
            return Err(Error::corrupt_object(format!(
                "{oid} is a {}, expected a blob",
                stored.object_type
            )));
        }

        decompress(&stored.data)
    }

    /// Decode a stored tree; `path` names the directory it snapshots
    pub fn load_tree(&self, oid: &ObjectId, path: &str) -> Result<Tree> {
        let stored = self.load(oid)?;
        if stored.object_type != ObjectType::Tree {
            return Err(Error::corrupt_object(format!(
                "{oid} is a {}, expected a tree",
                stored.object_type
            )));
        }

        Tree::from_buffer(self, stored.data.clone(), path)
    }

    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        let stored = self.load(oid)?;
        if stored.object_type != ObjectType::Commit {
            return Err(Error::corrupt_object(format!(
                "{oid} is a {}, expected a commit",
                stored.object_type
            )));
        }

        Commit::from_buffer(stored.data.clone(), self.algorithm)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.objects.contains_key(oid)
    }

    pub fn set_root(&mut self, tree: Tree) {
        tracing::debug!(tree = %tree.oid(), entries = tree.len(), "installed root tree");
        self.root = Some(tree);
    }

    /// Every object, ordered by key
    pub fn to_records(&self) -> Vec<ObjectRecord> {
        self.objects
            .iter()
            .map(|(oid, stored)| ObjectRecord {
                key: oid.to_string(),
                object_type: stored.object_type,
                data: stored.data.clone(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            refs: self.to_records(),
            index_hash: self.index_commit_hash.as_ref().map(ObjectId::to_string),
        }
    }

    /// Drop every object and forget the repository root
    ///
    /// The root tree, the commit chain and `index_commit_hash` are kept.
    pub fn reset_objects(&mut self) {
        self.objects.clear();
        self.repo_path = PathBuf::new();
        tracing::debug!("cleared objects");
    }

    /// Return to the freshly created state, keeping the digest algorithm
    pub fn reset_all(&mut self) {
        self.reset_objects();
        self.root = None;
        self.commits.clear();
        self.index_commit_hash = None;
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, StoredObject> {
        &self.objects
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    pub fn root(&self) -> Option<&Tree> {
        self.root.as_ref()
    }

    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn index_commit_hash(&self) -> Option<&ObjectId> {
        self.index_commit_hash.as_ref()
    }
}
