//! Index entry representation
//!
//! Each entry describes one tracked file:
//! - Path relative to the repository root
//! - Content hash (blob object ID)
//! - Stat metadata (timestamps, device, inode, mode, owner, size)
//!
//! ## Entry Format
//!
//! ```text
//! ctime | ctime_nsec | mtime | mtime_nsec | dev | ino | mode | uid | gid | size
//!   (10 x 4 bytes, network byte order)
//! sha   (raw digest, 20 bytes under SHA-1)
//! flags (2 bytes, see `entry_flags`)
//! path  (flags.name_length bytes) followed by 1..=8 NUL bytes
//! ```
//!
//! The deflated file content travels alongside the entry but is never part of
//! its buffer: the owning tree stores it in the object store under `sha`.

use crate::areas::workspace::Workspace;
use crate::artifacts::core::{compress, decompress};
use crate::artifacts::index::entry_flags::EntryFlags;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::{STAT_FIELDS_SIZE, entry_fixed_size, entry_padding};
use crate::artifacts::objects::hash_object::{DigestAlgorithm, hash_object};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// Stat information recorded for an entry
///
/// All fields are stored as 32-bit values; wider platform values are
/// truncated to their low 32 bits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    /// Change time (seconds since Unix epoch)
    pub ctime: u32,
    pub ctime_nsec: u32,
    /// Modification time (seconds since Unix epoch)
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: EntryMode,
    /// Identity of the process that scanned the file
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl From<&Metadata> for EntryMetadata {
    fn from(metadata: &Metadata) -> Self {
        let (uid, gid) = process_ids();

        Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: EntryMode::from_permissions(metadata.mode()),
            uid,
            gid,
            size: metadata.size() as u32,
        }
    }
}

/// Real user and group IDs of the running process
fn process_ids() -> (u32, u32) {
    // SAFETY: getuid and getgid always succeed and touch no memory
    unsafe { (libc::getuid(), libc::getgid()) }
}

/// A tracked file (or, with [`EntryMode::Directory`], a reference to a subtree)
#[derive(Debug, Clone, Default)]
pub struct IndexEntry {
    path: String,
    oid: ObjectId,
    metadata: EntryMetadata,
    flags: EntryFlags,
    buffer: Bytes,
    compressed: Option<Bytes>,
}

impl IndexEntry {
    /// Scan `relative_path` under `repo_root` and build its entry
    pub fn create(
        repo_root: &Path,
        relative_path: impl Into<String>,
        algorithm: DigestAlgorithm,
    ) -> Result<Self> {
        let mut entry = IndexEntry {
            path: relative_path.into(),
            ..Default::default()
        };
        entry.refresh(repo_root, algorithm)?;

        Ok(entry)
    }

    /// Entry referencing the subtree `oid` stored at `path`
    pub fn directory(path: impl Into<String>, oid: ObjectId) -> Result<Self> {
        let path = path.into();
        let mut entry = IndexEntry {
            flags: EntryFlags::for_path_len(path.len()),
            path,
            oid,
            metadata: EntryMetadata {
                mode: EntryMode::Directory,
                ..Default::default()
            },
            ..Default::default()
        };
        entry.serialize()?;

        Ok(entry)
    }

    /// Decode a single entry, ignoring whatever follows it
    pub fn from_buffer(buffer: Bytes, algorithm: DigestAlgorithm) -> Result<Self> {
        Self::parse(buffer, algorithm).map(|(entry, _)| entry)
    }

    /// Decode the entry at the start of `buffer`
    ///
    /// Returns the entry, whose own buffer is trimmed to exactly the consumed
    /// span, and the bytes left over for the next record.
    pub fn parse(buffer: Bytes, algorithm: DigestAlgorithm) -> Result<(Self, Bytes)> {
        let fixed_size = entry_fixed_size(algorithm);
        if buffer.len() < fixed_size {
            return Err(Error::truncated("index entry", fixed_size, buffer.len()));
        }

        let read_u32 = |offset: usize| byteorder::NetworkEndian::read_u32(&buffer[offset..]);
        let sha_end = STAT_FIELDS_SIZE + algorithm.raw_len();

        let oid = ObjectId::from_raw(&buffer[STAT_FIELDS_SIZE..sha_end])?;
        let flags = EntryFlags::from(byteorder::NetworkEndian::read_u16(&buffer[sha_end..]));
        let metadata = EntryMetadata {
            ctime: read_u32(0),
            ctime_nsec: read_u32(4),
            mtime: read_u32(8),
            mtime_nsec: read_u32(12),
            dev: read_u32(16),
            ino: read_u32(20),
            mode: EntryMode::try_from(read_u32(24))?,
            uid: read_u32(28),
            gid: read_u32(32),
            size: read_u32(36),
        };

        let path_end = fixed_size + flags.name_length();
        let consumed = path_end + entry_padding(algorithm, flags.name_length());
        if buffer.len() < consumed {
            return Err(Error::truncated("index entry", consumed, buffer.len()));
        }

        let path = String::from_utf8_lossy(&buffer[fixed_size..path_end]).into_owned();
        tracing::trace!(path = %path, %oid, consumed, "decoded index entry");

        let entry = IndexEntry {
            path,
            oid,
            metadata,
            flags,
            buffer: buffer.slice(..consumed),
            compressed: None,
        };

        Ok((entry, buffer.slice(consumed..)))
    }

    /// Re-read the file from disk and rebuild the entry in place
    pub fn refresh(&mut self, repo_root: &Path, algorithm: DigestAlgorithm) -> Result<()> {
        let workspace = Workspace::new(repo_root);
        let file_path = Path::new(&self.path);

        let metadata = workspace.stat_file(file_path)?;
        let data = workspace.read_file(file_path)?;

        self.oid = hash_object(Some(&data), ObjectType::Blob, algorithm)?.oid;
        self.metadata = metadata;
        self.flags = EntryFlags::for_path_len(self.path.len());
        self.compressed = Some(compress(&data)?);

        self.serialize()
    }

    /// Rebuild the entry's buffer from its fields
    pub fn serialize(&mut self) -> Result<()> {
        let name_length = self.flags.name_length();
        let mut entry_bytes = Vec::new();

        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mode.as_u32())?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.size)?;
        self.oid.write_raw_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.flags.into())?;
        entry_bytes.write_all(&self.path.as_bytes()[..name_length])?;

        let algorithm = DigestAlgorithm::from_hex_len(self.oid.as_ref().len())
            .ok_or_else(|| Error::invalid_object_id(self.oid.to_string()))?;
        entry_bytes.resize(
            entry_bytes.len() + entry_padding(algorithm, name_length),
            0,
        );

        self.buffer = Bytes::from(entry_bytes);
        Ok(())
    }

    /// Inflate the content attached to this entry
    pub fn file_data(&self) -> Result<Bytes> {
        let compressed = self
            .compressed
            .as_ref()
            .ok_or_else(|| Error::corrupt_object(format!("No content attached to {}", self.path)))?;

        decompress(compressed)
    }

    pub fn attach_compressed(&mut self, compressed: Bytes) {
        self.compressed = Some(compressed);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }

    pub fn mode(&self) -> EntryMode {
        self.metadata.mode
    }

    pub fn flags(&self) -> EntryFlags {
        self.flags
    }

    pub fn buffer(&self) -> &Bytes {
        &self.buffer
    }

    pub fn compressed(&self) -> Option<&Bytes> {
        self.compressed.as_ref()
    }

    pub fn is_directory(&self) -> bool {
        self.metadata.mode.is_tree()
    }
}
