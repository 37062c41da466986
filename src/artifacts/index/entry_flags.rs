//! The 16-bit flags field of an index entry
//!
//! ```text
//!   15  14  13-12  11 ............ 0
//! +---+---+------+------------------+
//! | V | X | stage|   path length    |
//! +---+---+------+------------------+
//! ```
//!
//! `V` is assume-valid, `X` is extended. Paths longer than 0xFFF bytes record
//! 0xFFF.

use crate::artifacts::index::MAX_PATH_SIZE;
use bitflags::bitflags;
use std::cmp::min;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FlagBits: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
    }
}

const STAGE_MASK: u16 = 0x3000;
const STAGE_SHIFT: u16 = 12;
const NAME_MASK: u16 = 0x0FFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryFlags {
    bits: FlagBits,
    stage: u8,
    name_length: u16,
}

impl EntryFlags {
    /// Flags of a stage-0 entry whose path is `path_len` bytes long
    pub fn for_path_len(path_len: usize) -> Self {
        EntryFlags {
            bits: FlagBits::empty(),
            stage: 0,
            name_length: min(path_len, MAX_PATH_SIZE) as u16,
        }
    }

    pub fn assume_valid(&self) -> bool {
        self.bits.contains(FlagBits::ASSUME_VALID)
    }

    pub fn extended(&self) -> bool {
        self.bits.contains(FlagBits::EXTENDED)
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn name_length(&self) -> usize {
        self.name_length as usize
    }

    pub fn with_bits(self, bits: FlagBits) -> Self {
        EntryFlags { bits, ..self }
    }

    pub fn with_stage(self, stage: u8) -> Self {
        EntryFlags {
            stage: stage & 0b11,
            ..self
        }
    }
}

impl From<u16> for EntryFlags {
    fn from(raw: u16) -> Self {
        EntryFlags {
            bits: FlagBits::from_bits_truncate(raw),
            stage: ((raw & STAGE_MASK) >> STAGE_SHIFT) as u8,
            name_length: raw & NAME_MASK,
        }
    }
}

impl From<EntryFlags> for u16 {
    fn from(flags: EntryFlags) -> Self {
        flags.bits.bits() | ((flags.stage as u16) << STAGE_SHIFT) | flags.name_length
    }
}
