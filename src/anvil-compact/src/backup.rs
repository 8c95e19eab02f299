//! Backup-then-rewrite guard.
//!
//! Before a container is rewritten, the original is renamed to a `.bak`
//! sibling and read back from there. Nothing is ever deleted: the backup stays
//! until an operator has checked the new file and removed it by hand.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::BACKUP_SUFFIX;
use crate::{CompactError, Result};

/// Paths produced by a successful [`swap_to_backup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSwap {
    /// Original path, now free for the rewritten container.
    pub target: PathBuf,
    /// Where the original data lives now.
    pub backup: PathBuf,
}

/// Sibling backup path: `<dir>/<name>.bak`.
pub fn backup_path(target: &Path) -> Result<PathBuf> {
    let name = target
        .file_name()
        .ok_or_else(|| CompactError::InvalidPath(target.to_path_buf()))?;
    let mut backup_name = OsString::from(name);
    backup_name.push(BACKUP_SUFFIX);
    Ok(target.with_file_name(backup_name))
}

/// Whether anything, including a dangling symlink, occupies `path`.
pub(crate) fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Rename `target` to its backup path.
///
/// Fails with [`CompactError::BackupAlreadyExists`] if a backup is already in
/// place, since that marks an earlier run nobody has resolved. A failed rename
/// is returned as-is and leaves `target` untouched.
pub fn swap_to_backup(target: &Path) -> Result<BackupSwap> {
    let backup = backup_path(target)?;
    if occupied(&backup) {
        return Err(CompactError::BackupAlreadyExists(backup));
    }
    fs::rename(target, &backup)?;
    info!(
        target = %target.display(),
        backup = %backup.display(),
        "Moved original to backup"
    );
    debug!(backup = %backup.display(), "Backup left in place for manual removal");
    Ok(BackupSwap {
        target: target.to_path_buf(),
        backup,
    })
}
