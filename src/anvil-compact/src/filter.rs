//! Copy filters and the retained-chunk set.

use std::collections::HashSet;
use std::collections::hash_set;

use anvil_region::{ChunkData, ChunkPos};
use tracing::warn;

use crate::policy::is_empty_chunk;

/// Decides, from the coordinate alone, whether a slot is worth reading.
pub trait MembershipFilter {
    fn admits(&self, pos: ChunkPos) -> bool;
}

impl<F> MembershipFilter for F
where
    F: Fn(ChunkPos) -> bool,
{
    fn admits(&self, pos: ChunkPos) -> bool {
        self(pos)
    }
}

/// Decides, from the record itself, whether it is copied.
pub trait ContentFilter {
    fn retains(&self, pos: ChunkPos, chunk: &ChunkData) -> bool;
}

impl<F> ContentFilter for F
where
    F: Fn(ChunkPos, &ChunkData) -> bool,
{
    fn retains(&self, pos: ChunkPos, chunk: &ChunkData) -> bool {
        self(pos, chunk)
    }
}

/// Keeps every chunk the emptiness policy cannot prove empty.
///
/// Records that cannot be inflated or decoded are kept: without a decoded
/// tree there is no proof they are empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyChunks;

impl ContentFilter for NonEmptyChunks {
    fn retains(&self, pos: ChunkPos, chunk: &ChunkData) -> bool {
        let raw = match chunk.decompress() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(chunk = %pos, error = %e, "Cannot inflate chunk, keeping it");
                return true;
            }
        };
        match anvil_nbt::from_bytes(&raw) {
            Ok(doc) => !is_empty_chunk(&doc.root),
            Err(e) => {
                warn!(chunk = %pos, error = %e, "Cannot decode chunk, keeping it");
                true
            }
        }
    }
}

/// Coordinates that survived region compaction.
///
/// Filled by the copy engine, read-only afterwards. Metadata containers are
/// filtered against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainedChunks {
    chunks: HashSet<ChunkPos>,
}

impl RetainedChunks {
    pub(crate) fn insert(&mut self, pos: ChunkPos) {
        self.chunks.insert(pos);
    }

    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, ChunkPos> {
        self.chunks.iter()
    }

    /// Coordinates in sorted order.
    pub fn sorted(&self) -> Vec<ChunkPos> {
        let mut out: Vec<_> = self.chunks.iter().copied().collect();
        out.sort();
        out
    }
}

impl MembershipFilter for RetainedChunks {
    fn admits(&self, pos: ChunkPos) -> bool {
        self.contains(pos)
    }
}

impl FromIterator<ChunkPos> for RetainedChunks {
    fn from_iter<I: IntoIterator<Item = ChunkPos>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RetainedChunks {
    type Item = &'a ChunkPos;
    type IntoIter = hash_set::Iter<'a, ChunkPos>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}
