//! Object data structures and codecs
//!
//! - `core`: Shared utilities (zlib compression)
//! - `index`: Binary index-entry layout shared by trees
//! - `objects`: Object types (blob hashing, tree, commit)

pub mod core;
pub mod index;
pub mod objects;
