//! Chunk and region coordinates.

use serde::Serialize;
use std::fmt;

/// Chunks along one edge of a region.
pub const REGION_WIDTH: i32 = 32;

/// Chunk slots in one region file.
pub const CHUNKS_PER_REGION: usize = (REGION_WIDTH * REGION_WIDTH) as usize;

/// Position of a region file in the region grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionPos {
    pub x: i32,
    pub z: i32,
}

impl RegionPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// File name of this region inside a region directory.
    pub fn file_name(&self) -> String {
        format!("r.{}.{}.mca", self.x, self.z)
    }

    /// Parse a `r.<x>.<z>.mca` file name.
    ///
    /// Only the canonical spelling produced by [`file_name`](Self::file_name)
    /// is accepted, so `r.01.0.mca` or `r.+1.0.mca` yield `None`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("r.")?.strip_suffix(".mca")?;
        let (x, z) = rest.split_once('.')?;
        let region = Self::new(x.parse().ok()?, z.parse().ok()?);
        (region.file_name() == name).then_some(region)
    }

    /// Every chunk slot in this region, row by row along z.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkPos> + use<> {
        let base_x = self.x * REGION_WIDTH;
        let base_z = self.z * REGION_WIDTH;
        (0..REGION_WIDTH).flat_map(move |lz| {
            (0..REGION_WIDTH).map(move |lx| ChunkPos::new(base_x + lx, base_z + lz))
        })
    }
}

impl fmt::Display for RegionPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r.{}.{}", self.x, self.z)
    }
}

/// Position of a chunk in the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Region containing this chunk.
    pub fn region(&self) -> RegionPos {
        RegionPos::new(self.x >> 5, self.z >> 5)
    }

    /// Slot of this chunk in its region's header tables.
    pub fn local_index(&self) -> usize {
        ((self.x & 31) + (self.z & 31) * REGION_WIDTH) as usize
    }

    /// File name used when the record is stored outside the region file.
    pub fn external_file_name(&self) -> String {
        format!("c.{}.{}.mcc", self.x, self.z)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}
