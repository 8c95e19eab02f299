//! Backup-then-rewrite of a single region container.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use anvil_region::RegionDir;

use crate::backup::swap_to_backup;
use crate::copy::{CopyOutcome, CopyStats, copy_chunks};
use crate::filter::{ContentFilter, MembershipFilter};
use crate::{CompactError, Result};

/// What happened to one rewritten container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerReport {
    /// Rewritten container.
    pub path: PathBuf,
    /// Where the original was moved.
    pub backup: PathBuf,
    pub stats: CopyStats,
    pub duration_ms: u64,
}

/// Move `path` to its backup, then copy the backup back into a fresh
/// container at `path` through the given filters.
///
/// Both containers are closed before this returns, on success and on error.
pub(crate) fn rewrite_container(
    path: &Path,
    membership: Option<&dyn MembershipFilter>,
    content: Option<&dyn ContentFilter>,
) -> Result<(ContainerReport, CopyOutcome)> {
    if !path.is_dir() {
        return Err(CompactError::NotADirectory(path.to_path_buf()));
    }
    let start = Instant::now();
    let swap = swap_to_backup(path)?;

    let mut source = RegionDir::open_read(&swap.backup)?;
    let mut dest = RegionDir::create(&swap.target)?;

    let copied = copy_chunks(&mut source, &mut dest, membership, content);
    let dest_closed = dest.close();
    let source_closed = source.close();
    let outcome = copied?;
    dest_closed?;
    source_closed?;

    let report = ContainerReport {
        path: swap.target,
        backup: swap.backup,
        stats: outcome.stats,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        path = %report.path.display(),
        copied = report.stats.copied,
        rejected = report.stats.rejected,
        filtered_out = report.stats.filtered_out,
        corrupt_skipped = report.stats.corrupt_skipped,
        duration_ms = report.duration_ms,
        "Container rewritten"
    );
    Ok((report, outcome))
}
