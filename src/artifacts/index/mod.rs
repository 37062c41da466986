//! Index buffer format
//!
//! Trees are serialized in the layout of the staging index (version 2).
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 10 x 4-byte stat fields, raw object ID, 2-byte flags
//!   - Path bytes, then 1..=8 NUL bytes up to the next 8-byte boundary
//! ```

pub mod entry_flags;
pub mod entry_mode;
pub mod index_entry;
pub mod index_header;

use crate::artifacts::objects::hash_object::DigestAlgorithm;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying index buffers
pub const SIGNATURE: &str = "DIRC";

/// Index format version
pub const VERSION: u32 = 2;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Bytes taken by the ten 4-byte stat fields
pub const STAT_FIELDS_SIZE: usize = 40;

/// Size of the flags field
pub const FLAGS_SIZE: usize = 2;

/// Longest path length representable in the flags field
pub const MAX_PATH_SIZE: usize = 0xFFF;

/// Size of an entry's fixed block (62 bytes under SHA-1, 74 under SHA-256)
pub fn entry_fixed_size(algorithm: DigestAlgorithm) -> usize {
    STAT_FIELDS_SIZE + algorithm.raw_len() + FLAGS_SIZE
}

/// Number of NUL bytes that follow a path of `path_len` bytes
pub fn entry_padding(algorithm: DigestAlgorithm, path_len: usize) -> usize {
    ENTRY_BLOCK - ((entry_fixed_size(algorithm) + path_len) % ENTRY_BLOCK)
}
