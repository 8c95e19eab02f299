//! Filtered copy of chunk records between containers.

use serde::Serialize;
use tracing::{debug, warn};

use anvil_region::RegionDir;

use crate::Result;
use crate::filter::{ContentFilter, MembershipFilter, RetainedChunks};

/// Counters for one container copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    /// Addressable slots enumerated, populated or not.
    pub slots_visited: usize,
    /// Slots skipped by the membership filter without being read.
    pub filtered_out: usize,
    /// Slots with no record.
    pub absent: usize,
    /// Records skipped because the source record was unreadable.
    pub corrupt_skipped: usize,
    /// Records the content filter declined.
    pub rejected: usize,
    /// Records written to the destination.
    pub copied: usize,
    /// Payload bytes written to the destination.
    pub bytes_copied: u64,
}

/// Result of [`copy_chunks`].
#[derive(Debug, Clone, Default)]
pub struct CopyOutcome {
    pub stats: CopyStats,
    pub retained: RetainedChunks,
}

/// Copy every record of `source` into `dest`, subject to two optional filters.
///
/// For each addressable slot of each region: the membership filter is asked
/// first and a refusal skips the slot without reading it; then the record is
/// read and skipped if absent; then the content filter sees the record. A
/// record that passes is written unchanged at the same coordinate and its
/// coordinate is recorded as retained.
///
/// A corrupt source record is logged and skipped. Every other error aborts the
/// copy.
pub fn copy_chunks(
    source: &mut RegionDir,
    dest: &mut RegionDir,
    membership: Option<&dyn MembershipFilter>,
    content: Option<&dyn ContentFilter>,
) -> Result<CopyOutcome> {
    let mut outcome = CopyOutcome::default();
    let stats = &mut outcome.stats;

    for region in source.regions()? {
        let copied_before = stats.copied;
        for pos in source.chunks_in(region, true)? {
            stats.slots_visited += 1;

            if let Some(filter) = membership
                && !filter.admits(pos)
            {
                stats.filtered_out += 1;
                continue;
            }

            let chunk = match source.read(pos) {
                Ok(Some(chunk)) => chunk,
                Ok(None) => {
                    stats.absent += 1;
                    continue;
                }
                Err(e) if e.is_record_local() => {
                    warn!(chunk = %pos, error = %e, "Skipping unreadable chunk");
                    stats.corrupt_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(filter) = content
                && !filter.retains(pos, &chunk)
            {
                stats.rejected += 1;
                continue;
            }

            dest.write(pos, &chunk)?;
            stats.copied += 1;
            stats.bytes_copied += chunk.payload.len() as u64;
            outcome.retained.insert(pos);
        }
        debug!(
            region = %region,
            copied = stats.copied - copied_before,
            "Copied region"
        );
    }

    Ok(outcome)
}
