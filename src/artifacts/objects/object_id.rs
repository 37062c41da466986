//! Object identifier (hex digest)
//!
//! Object IDs are lowercase hexadecimal digests: 40 characters under SHA-1 and
//! 64 under SHA-256. Inside index entries they are stored as raw bytes (20 or 32).

use crate::artifacts::objects::hash_object::DigestAlgorithm;
use crate::errors::{Error, Result};
use std::io;

/// Hex-encoded digest that uniquely identifies an object in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Accepts the hex lengths of every supported digest algorithm.
    pub fn try_parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if DigestAlgorithm::from_hex_len(id.len()).is_none() {
            return Err(Error::invalid_object_id(format!(
                "invalid length {} for {id:?}",
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_object_id(format!(
                "invalid characters in {id:?}"
            )));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Build an object ID from raw digest bytes.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        Self::try_parse(hex::encode(raw))
    }

    /// Write the object ID in binary format (20 or 32 bytes)
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let raw = hex::decode(&self.0).map_err(|e| Error::invalid_object_id(e.to_string()))?;
        writer.write_all(&raw)?;

        Ok(())
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
