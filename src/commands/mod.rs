//! Command implementations
//!
//! Organized the way git splits its commands:
//!
//! - `plumbing`: Low-level commands over objects (hash-object, write-tree, ls-tree, export)
//! - `porcelain`: User-facing commands (commit)

pub mod plumbing;
pub mod porcelain;
