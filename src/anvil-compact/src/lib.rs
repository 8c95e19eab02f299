//! Compaction for Anvil world stores.
//!
//! Rewrites a world's region containers so that chunks holding nothing but
//! air are dropped and the remaining records are packed into fresh files.
//!
//! # Pipeline
//!
//! - **Region compaction**: `region/` is renamed to `region.bak/`, every
//!   chunk is decoded and classified, and non-empty chunks are copied into a
//!   new `region/`. The coordinates that survive form a [`RetainedChunks`] set.
//! - **Metadata compaction**: `entities/` and `poi/` go through the same
//!   backup-then-rewrite sequence but keep only coordinates in the retained
//!   set; their payloads are never decoded.
//! - **Player-data scrub**: the embedded `Player` compound in `level.dat` is
//!   cleared, keeping the original as `level.dat.bak`.
//!
//! # Safety
//!
//! Originals are only ever renamed, never deleted. A leftover `.bak` marks an
//! interrupted or unverified run and blocks further compaction of that path
//! until an operator removes it. Compaction assumes exclusive access to the
//! world directory for the whole run.
//!
//! # Example
//!
//! ```rust,no_run
//! use anvil_compact::{CompactOptions, WorldCompactor};
//!
//! let compactor = WorldCompactor::new(CompactOptions::default());
//! let report = compactor.run("saves/New World".as_ref()).expect("compaction failed");
//! println!("kept {} chunks", report.region.stats.copied);
//! ```

pub mod backup;
pub mod config;
mod container;
pub mod copy;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod player;
pub mod policy;
pub mod region;
pub mod world;

pub use backup::{BackupSwap, backup_path, swap_to_backup};
pub use config::{
    BACKUP_SUFFIX, CompactOptions, DEFAULT_METADATA_DIRS, LEVEL_DAT_FILE, REGION_DIR,
};
pub use container::ContainerReport;
pub use copy::{CopyOutcome, CopyStats, copy_chunks};
pub use error::{CompactError, Result};
pub use filter::{ContentFilter, MembershipFilter, NonEmptyChunks, RetainedChunks};
pub use metadata::MetadataCompactor;
pub use player::{PlayerDataScrubber, ScrubOutcome};
pub use policy::{AIR_BLOCK, ChunkSchema, is_empty_chunk};
pub use region::{RegionCompaction, RegionCompactor};
pub use world::{WorldCompactor, WorldReport};
