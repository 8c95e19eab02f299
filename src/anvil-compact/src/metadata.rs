//! Compaction of coordinate-keyed metadata containers (`entities`, `poi`).

use std::path::Path;

use crate::Result;
use crate::container::{ContainerReport, rewrite_container};
use crate::filter::RetainedChunks;

/// Rewrites a metadata container, keeping only retained coordinates.
///
/// Payloads are copied without being decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataCompactor;

impl MetadataCompactor {
    pub fn new() -> Self {
        Self
    }

    pub fn compact(&self, path: &Path, retained: &RetainedChunks) -> Result<ContainerReport> {
        let (report, _) = rewrite_container(path, Some(retained), None)?;
        Ok(report)
    }
}
