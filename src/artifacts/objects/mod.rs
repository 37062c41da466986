//! Object types and hashing
//!
//! All content is stored as objects identified by the digest of their canonical
//! form `<type> <size>\0<content>`. There are three types:
//!
//! - **Blob**: file content, stored zlib-compressed under the blob digest
//! - **Tree**: a directory snapshot in the binary `DIRC` layout
//! - **Commit**: a tree snapshot plus parent, author, committer and message

pub mod commit;
pub mod hash_object;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Path of a root tree
pub const ROOT_PATH: &str = ".";
