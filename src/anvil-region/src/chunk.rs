//! Raw chunk records.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};

use crate::error::{RegionError, Result};

/// Bit set on the compression byte when the payload lives in a `.mcc` file.
pub const EXTERNAL_FLAG: u8 = 0x80;

/// Compression applied to a chunk payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionScheme {
    Gzip,
    Zlib,
    Uncompressed,
    Lz4,
    Custom,
    Unknown(u8),
}

impl CompressionScheme {
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => CompressionScheme::Gzip,
            2 => CompressionScheme::Zlib,
            3 => CompressionScheme::Uncompressed,
            4 => CompressionScheme::Lz4,
            127 => CompressionScheme::Custom,
            other => CompressionScheme::Unknown(other),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            CompressionScheme::Gzip => 1,
            CompressionScheme::Zlib => 2,
            CompressionScheme::Uncompressed => 3,
            CompressionScheme::Lz4 => 4,
            CompressionScheme::Custom => 127,
            CompressionScheme::Unknown(id) => id,
        }
    }
}

/// One chunk record as stored in a region file.
///
/// `payload` holds the compressed bytes exactly as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkData {
    pub compression: CompressionScheme,
    pub payload: Vec<u8>,
    /// Last modification time from the region header, in epoch seconds.
    pub timestamp: u32,
}

impl ChunkData {
    pub fn new(compression: CompressionScheme, payload: Vec<u8>, timestamp: u32) -> Self {
        Self {
            compression,
            payload,
            timestamp,
        }
    }

    /// Compress `raw` with `compression` and wrap it as a record.
    pub fn compress(compression: CompressionScheme, raw: &[u8], timestamp: u32) -> Result<Self> {
        let payload = match compression {
            CompressionScheme::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(raw)?;
                encoder.finish()?
            }
            CompressionScheme::Zlib => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(raw)?;
                encoder.finish()?
            }
            CompressionScheme::Uncompressed => raw.to_vec(),
            other => return Err(RegionError::UnsupportedCompression(other)),
        };
        Ok(Self::new(compression, payload, timestamp))
    }

    /// Inflate the payload.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match self.compression {
            CompressionScheme::Gzip => {
                GzDecoder::new(self.payload.as_slice()).read_to_end(&mut out)?;
            }
            CompressionScheme::Zlib => {
                ZlibDecoder::new(self.payload.as_slice()).read_to_end(&mut out)?;
            }
            CompressionScheme::Uncompressed => out.extend_from_slice(&self.payload),
            other => return Err(RegionError::UnsupportedCompression(other)),
        }
        Ok(out)
    }
}
