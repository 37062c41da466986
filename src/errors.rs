//! Error types for bitstate.
//!
//! Every failure raised by the object store, the binary codecs and the directory
//! walk is a variant of [`Error`]. Variants fall into one of the categories of
//! [`ErrorKind`], which callers can use to tell structural mistakes apart from
//! corrupt input or missing data.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using bitstate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structural or invariant violation
    Schema,
    /// Malformed binary or text buffer
    Parse,
    /// Missing filesystem path or object-store entry
    NotFound,
    /// Commit message validation
    EmptyMessage,
    /// Underlying I/O failure
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    /// Content handed to the hasher was absent.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A tree or store invariant was violated.
    #[error("{0}")]
    Schema(String),

    /// A directory was expected.
    #[error("Received a non directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A regular file was expected.
    #[error("Not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Object ID of the wrong length or with non-hex characters.
    #[error("Invalid object ID: {reason}")]
    InvalidObjectId { reason: String },

    #[error("Invalid index signature: {found:?}")]
    BadSignature { found: String },

    #[error("Unsupported index version: {version}")]
    UnsupportedVersion { version: u32 },

    /// Fewer bytes remained than the record being decoded requires.
    #[error("Truncated {what}: needed {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid commit line {line}: {content:?}")]
    MalformedCommit { line: usize, content: String },

    #[error("Invalid author: {reason}")]
    InvalidAuthor { reason: String },

    /// Stored content could not be decompressed or decoded.
    #[error("Corrupt object: {reason}")]
    CorruptObject { reason: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    /// A hash referenced by a buffer has no entry in the object store.
    #[error("Object not found: {oid}")]
    MissingObject { oid: String },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput { .. }
            | Error::Schema(_)
            | Error::NotADirectory { .. }
            | Error::NotAFile { .. }
            | Error::InvalidObjectId { .. } => ErrorKind::Schema,
            Error::BadSignature { .. }
            | Error::UnsupportedVersion { .. }
            | Error::Truncated { .. }
            | Error::MalformedCommit { .. }
            | Error::InvalidAuthor { .. }
            | Error::CorruptObject { .. } => ErrorKind::Parse,
            Error::PathNotFound { .. } | Error::MissingObject { .. } => ErrorKind::NotFound,
            Error::EmptyMessage => ErrorKind::EmptyMessage,
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Error::Schema(message.into())
    }

    pub fn invalid_object_id(reason: impl Into<String>) -> Self {
        Error::InvalidObjectId {
            reason: reason.into(),
        }
    }

    pub fn invalid_author(reason: impl Into<String>) -> Self {
        Error::InvalidAuthor {
            reason: reason.into(),
        }
    }

    pub fn corrupt_object(reason: impl Into<String>) -> Self {
        Error::CorruptObject {
            reason: reason.into(),
        }
    }

    pub fn missing_object(oid: impl ToString) -> Self {
        Error::MissingObject {
            oid: oid.to_string(),
        }
    }

    pub fn truncated(what: &'static str, needed: usize, available: usize) -> Self {
        Error::Truncated {
            what,
            needed,
            available,
        }
    }
}
