//! Whole-world compaction run.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{CompactOptions, LEVEL_DAT_FILE, REGION_DIR};
use crate::container::ContainerReport;
use crate::metadata::MetadataCompactor;
use crate::player::{PlayerDataScrubber, ScrubOutcome};
use crate::region::RegionCompactor;
use crate::{CompactError, Result};

/// Summary of a world compaction run.
#[derive(Debug, Clone, Serialize)]
pub struct WorldReport {
    pub world: PathBuf,
    pub region: ContainerReport,
    /// Chunks that survived region compaction.
    pub retained_chunks: usize,
    /// One entry per metadata container that was present.
    pub metadata: Vec<ContainerReport>,
    pub player_data: ScrubOutcome,
    pub duration_ms: u64,
}

/// Runs region compaction, metadata compaction and the player-data scrub
/// over one world directory, in that order.
///
/// The first failure aborts the run. Containers finished before it stay
/// rewritten; the failing one is either untouched or still has its backup.
pub struct WorldCompactor {
    options: CompactOptions,
}

impl WorldCompactor {
    pub fn new(options: CompactOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompactOptions {
        &self.options
    }

    pub fn run(&self, world: &Path) -> Result<WorldReport> {
        let start = Instant::now();
        self.options.validate()?;
        if !world.is_dir() {
            return Err(CompactError::NotADirectory(world.to_path_buf()));
        }
        let region_dir = world.join(REGION_DIR);
        if !region_dir.is_dir() {
            return Err(CompactError::MissingRequiredSubdirectory {
                world: world.to_path_buf(),
                name: REGION_DIR.to_string(),
            });
        }

        info!(
            world = %world.display(),
            avoid_empty_chunks = self.options.avoid_empty_chunks,
            "Compacting world"
        );
        let region = RegionCompactor::new(self.options.avoid_empty_chunks).compact(&region_dir)?;

        let mut metadata = Vec::new();
        for name in &self.options.metadata_dirs {
            let dir = world.join(name);
            if !dir.is_dir() {
                debug!(dir = %dir.display(), "No metadata directory, skipping");
                continue;
            }
            metadata.push(MetadataCompactor::new().compact(&dir, &region.retained)?);
        }

        let player_data = self.scrub_player_data(world)?;

        let report = WorldReport {
            world: world.to_path_buf(),
            retained_chunks: region.retained.len(),
            region: region.report,
            metadata,
            player_data,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            world = %world.display(),
            retained_chunks = report.retained_chunks,
            metadata_containers = report.metadata.len(),
            duration_ms = report.duration_ms,
            "World compaction complete"
        );
        Ok(report)
    }

    fn scrub_player_data(&self, world: &Path) -> Result<ScrubOutcome> {
        if !self.options.scrub_player_data {
            return Ok(ScrubOutcome::Disabled);
        }
        let level_dat = world.join(LEVEL_DAT_FILE);
        if !level_dat.is_file() {
            warn!(path = %level_dat.display(), "No level.dat, skipping player data");
            return Ok(ScrubOutcome::Missing);
        }
        PlayerDataScrubber::new().scrub(&level_dat)
    }
}
