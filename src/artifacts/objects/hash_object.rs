//! Content hashing
//!
//! Every object is addressed by the digest of its canonical form:
//!
//! ```text
//! <kind> <byte-length-of-content>\0<content>
//! ```
//!
//! The digest is taken over exactly those bytes, so identical `(kind, content)`
//! pairs always produce the same ID.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::str::FromStr;

/// Digest function used to address objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    /// Width of the raw digest in bytes
    pub fn raw_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
        }
    }

    pub fn hex_len(&self) -> usize {
        self.raw_len() * 2
    }

    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(DigestAlgorithm::Sha1),
            64 => Some(DigestAlgorithm::Sha256),
            _ => None,
        }
    }

    fn digest(&self, data: &[u8]) -> String {
        match self {
            DigestAlgorithm::Sha1 => format!("{:x}", Sha1::digest(data)),
            DigestAlgorithm::Sha256 => format!("{:x}", Sha256::digest(data)),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            _ => Err(Error::invalid_input(format!(
                "Unsupported digest algorithm {s:?}"
            ))),
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of hashing a typed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedObject {
    /// Lowercase hex digest of `header`
    pub oid: ObjectId,
    /// The canonical `<kind> <len>\0<content>` bytes that were hashed
    pub header: Bytes,
}

/// Hash `content` as an object of type `kind`.
///
/// `None` is rejected with [`Error::InvalidInput`]; an empty slice is a valid
/// payload.
pub fn hash_object(
    content: Option<&[u8]>,
    kind: ObjectType,
    algorithm: DigestAlgorithm,
) -> Result<HashedObject> {
    let content = content.ok_or_else(|| Error::invalid_input("Nothing to hash"))?;

    let mut header = Vec::with_capacity(content.len() + 32);
    write!(header, "{} {}\0", kind.as_str(), content.len())?;
    header.extend_from_slice(content);

    let oid = ObjectId::try_parse(algorithm.digest(&header))?;

    Ok(HashedObject {
        oid,
        header: Bytes::from(header),
    })
}
