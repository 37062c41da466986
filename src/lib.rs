//! Content-addressed snapshots of a directory, in git's object model.
//!
//! Files are hashed as blobs, directories become trees serialized in the binary
//! index layout, and commits chain root trees together. Every object lives in an
//! in-memory [`ObjectStore`] keyed by its hex digest.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

pub use areas::builder::TreeBuilder;
pub use areas::database::{CommitOutcome, ObjectRecord, ObjectStore, StoreSnapshot, StoredObject};
pub use artifacts::index::index_entry::IndexEntry;
pub use artifacts::objects::commit::{Author, Commit, CommitData};
pub use artifacts::objects::hash_object::{DigestAlgorithm, HashedObject, hash_object};
pub use artifacts::objects::object_id::ObjectId;
pub use artifacts::objects::object_type::ObjectType;
pub use artifacts::objects::tree::{Tree, TreeChild};
pub use errors::{Error, ErrorKind, Result};
