//! Error types for anvil-region.

use std::path::PathBuf;
use thiserror::Error;

use crate::chunk::CompressionScheme;
use crate::pos::ChunkPos;

/// Region container error types.
#[derive(Debug, Error)]
pub enum RegionError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The container path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A chunk's header entry or record is unusable.
    #[error("Corrupt chunk {pos}: {reason}")]
    CorruptChunk { pos: ChunkPos, reason: String },

    /// Attempted to write to a container opened for reading.
    #[error("Container opened read-only: {0}")]
    ReadOnly(PathBuf),

    /// Payload compression this crate cannot inflate.
    #[error("Unsupported compression scheme: {0:?}")]
    UnsupportedCompression(CompressionScheme),
}

impl RegionError {
    pub(crate) fn corrupt(pos: ChunkPos, reason: impl Into<String>) -> Self {
        RegionError::CorruptChunk {
            pos,
            reason: reason.into(),
        }
    }

    /// Whether the error concerns a single record and leaves the container
    /// usable for the remaining chunks.
    pub fn is_record_local(&self) -> bool {
        matches!(
            self,
            RegionError::CorruptChunk { .. } | RegionError::UnsupportedCompression(_)
        )
    }
}

/// Result type for region operations.
pub type Result<T> = std::result::Result<T, RegionError>;
