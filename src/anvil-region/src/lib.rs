//! Anvil Region - region-file containers for Anvil worlds.
//!
//! A world keeps chunk records in directories of region files named
//! `r.<rx>.<rz>.mca`. Each file covers a 32x32 grid of chunks and starts with
//! two 4 KiB tables:
//!
//! - **Locations**: per chunk, a 3-byte sector offset and 1-byte sector count
//! - **Timestamps**: per chunk, last modification time in epoch seconds
//!
//! A chunk record is a 4-byte big-endian length, a compression byte and the
//! compressed payload. Records too large for 255 sectors live in a sibling
//! `c.<x>.<z>.mcc` file and set the `0x80` bit on the compression byte.
//!
//! [`RegionDir`] exposes one such directory as a single container addressed by
//! [`ChunkPos`]. Payload bytes are never re-encoded: what is read is what gets
//! written.
//!
//! # Usage
//!
//! ```rust,no_run
//! use anvil_region::RegionDir;
//!
//! fn main() -> anvil_region::Result<()> {
//!     let mut source = RegionDir::open_read("world/region.bak")?;
//!     let mut dest = RegionDir::create("world/region")?;
//!     for region in source.regions()? {
//!         for pos in source.chunks_in(region, false)? {
//!             if let Some(chunk) = source.read(pos)? {
//!                 dest.write(pos, &chunk)?;
//!             }
//!         }
//!     }
//!     dest.close()?;
//!     source.close()
//! }
//! ```

pub mod chunk;
pub mod dir;
pub mod error;
mod file;
pub mod pos;

pub use chunk::{ChunkData, CompressionScheme};
pub use dir::{OpenMode, RegionDir};
pub use error::{RegionError, Result};
pub use pos::{ChunkPos, RegionPos, CHUNKS_PER_REGION, REGION_WIDTH};

/// Size of one sector in a region file.
pub const SECTOR_BYTES: usize = 4096;
