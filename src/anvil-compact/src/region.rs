//! Compaction of the primary chunk container.

use std::path::Path;

use crate::Result;
use crate::container::{ContainerReport, rewrite_container};
use crate::filter::{ContentFilter, NonEmptyChunks, RetainedChunks};

/// Result of compacting the region container.
#[derive(Debug, Clone)]
pub struct RegionCompaction {
    pub report: ContainerReport,
    /// Chunks that were copied; the authoritative list for metadata compaction.
    pub retained: RetainedChunks,
}

/// Rewrites the region container, optionally dropping empty chunks.
#[derive(Debug, Clone, Copy)]
pub struct RegionCompactor {
    avoid_empty_chunks: bool,
}

impl RegionCompactor {
    /// With `avoid_empty_chunks` false every present chunk is kept and no
    /// payload is decoded, which amounts to a plain defragmentation.
    pub fn new(avoid_empty_chunks: bool) -> Self {
        Self { avoid_empty_chunks }
    }

    pub fn compact(&self, path: &Path) -> Result<RegionCompaction> {
        let content: Option<&dyn ContentFilter> = if self.avoid_empty_chunks {
            Some(&NonEmptyChunks)
        } else {
            None
        };
        let (report, outcome) = rewrite_container(path, None, content)?;
        Ok(RegionCompaction {
            report,
            retained: outcome.retained,
        })
    }
}

impl Default for RegionCompactor {
    fn default() -> Self {
        Self::new(true)
    }
}
