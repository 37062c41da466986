//! Porcelain commands
//!
//! - `commit`: Snapshot a directory and commit the root tree

pub mod commit;
