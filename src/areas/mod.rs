//! Core repository components
//!
//! - `builder`: Walks the working directory and builds nested trees
//! - `database`: In-memory object store for blobs, trees, and commits
//! - `repository`: Ties a directory, its object store and command output together
//! - `workspace`: Working directory file system operations

pub mod builder;
pub mod database;
pub mod repository;
pub mod workspace;
