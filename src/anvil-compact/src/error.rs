//! Error types for anvil-compact.

use std::path::PathBuf;
use thiserror::Error;

use anvil_nbt::NbtError;
use anvil_region::RegionError;

/// Compaction error types.
#[derive(Debug, Error)]
pub enum CompactError {
    /// The world root or a container is not a directory.
    #[error("Target is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A subdirectory every world must have is absent.
    #[error("Missing required directory `{name}` in {world}, is this an Anvil world?")]
    MissingRequiredSubdirectory { world: PathBuf, name: String },

    /// A backup from an earlier run is still in place.
    #[error("Backup already exists: {0} (inspect and remove it before compacting again)")]
    BackupAlreadyExists(PathBuf),

    /// Compaction options that would touch the wrong paths.
    #[error("Invalid metadata directory `{name}`: {reason}")]
    InvalidMetadataDir { name: String, reason: &'static str },

    /// Path has no final component to derive a backup name from.
    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),

    /// Region container failure.
    #[error("Region error: {0}")]
    Region(#[from] RegionError),

    /// NBT codec failure.
    #[error("NBT error: {0}")]
    Nbt(#[from] NbtError),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for compaction operations.
pub type Result<T> = std::result::Result<T, CompactError>;
