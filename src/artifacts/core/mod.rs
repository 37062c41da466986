//! Core utilities and shared types
//!
//! Zlib compression of blob content. Blobs are kept deflated in the object
//! store and inflated on demand.

use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::{Read, Write};

pub fn compress(data: &[u8]) -> Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;

    let compressed = encoder.finish()?;
    Ok(compressed.into())
}

pub fn decompress(data: &[u8]) -> Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut decompressed_content = Vec::new();
    decoder
        .read_to_end(&mut decompressed_content)
        .map_err(|e| Error::corrupt_object(format!("Unable to decompress content: {e}")))?;

    Ok(decompressed_content.into())
}
