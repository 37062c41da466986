//! Plumbing commands
//!
//! ## Commands
//!
//! - `hash-object`: Compute the blob ID of a file
//! - `write-tree`: Snapshot a directory and print the root tree ID
//! - `ls-tree`: List the root tree's children
//! - `export`: Dump every stored object as JSON

pub mod export;
pub mod hash_object;
pub mod ls_tree;
pub mod write_tree;
