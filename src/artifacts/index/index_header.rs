use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::errors::{Error, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHeader {
    pub(crate) marker: String,
    pub(crate) version: u32,
    pub(crate) entries_count: u32,
}

impl IndexHeader {
    pub(crate) fn with_count(entries_count: u32) -> Self {
        IndexHeader {
            marker: String::from(SIGNATURE),
            version: VERSION,
            entries_count,
        }
    }

    pub fn entries_count(&self) -> u32 {
        self.entries_count
    }

    pub fn serialize(&self) -> Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(self.marker.as_bytes())?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }

    /// Decode and validate a header from the start of `bytes`
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::truncated("index header", HEADER_SIZE, bytes.len()));
        }

        let marker = String::from_utf8_lossy(&bytes[0..4]).into_owned();
        if marker != SIGNATURE {
            return Err(Error::BadSignature { found: marker });
        }

        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        if version != VERSION {
            return Err(Error::UnsupportedVersion { version });
        }

        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_layout_is_signature_version_count() {
        let bytes = IndexHeader::with_count(3).serialize().unwrap();

        assert_eq!(bytes.as_ref(), b"DIRC\0\0\0\x02\0\0\0\x03");
        assert_eq!(IndexHeader::deserialize(&bytes).unwrap().entries_count(), 3);
    }

    #[test]
    fn bad_signature_is_rejected() {
        let error = IndexHeader::deserialize(b"DIRX\0\0\0\x02\0\0\0\0").unwrap_err();

        assert!(matches!(error, Error::BadSignature { .. }));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let error = IndexHeader::deserialize(b"DIRC\0\0\0\x03\0\0\0\0").unwrap_err();

        assert!(matches!(error, Error::UnsupportedVersion { version: 3 }));
    }

    #[test]
    fn short_header_is_truncated() {
        let error = IndexHeader::deserialize(b"DIRC").unwrap_err();

        assert!(matches!(error, Error::Truncated { needed: 12, .. }));
    }
}
