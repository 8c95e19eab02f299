//! Emptiness classification of decoded chunk payloads.
//!
//! Chunks have been stored under more than one schema over time. Each known
//! schema gets its own variant of [`ChunkSchema`] with its own test; anything
//! else is [`ChunkSchema::Unrecognized`] and always kept. Support for a new
//! layout is added as a new variant, never by loosening an existing one.

use anvil_nbt::{Compound, List, Tag};

/// Block name of an air-only palette entry.
pub const AIR_BLOCK: &str = "minecraft:air";

const LEGACY_LEVEL: &str = "Level";
const LEGACY_SECTIONS: &str = "Sections";
const MODERN_SECTIONS: &str = "sections";
const BLOCK_STATES: &str = "block_states";
const PALETTE: &str = "palette";
const PALETTE_NAME: &str = "Name";
const PACKED_DATA: &str = "data";

/// Layout of a chunk payload, detected from its top-level fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkSchema<'a> {
    /// Everything nested under `Level` (1.8 through 1.17).
    ///
    /// `sections` is `None` when `Level` has no usable `Sections` list.
    Legacy { sections: Option<&'a List> },
    /// Top-level `sections` list with paletted block states (1.18 onward).
    ///
    /// `sections` is `None` when the field is present but not a list.
    Modern { sections: Option<&'a List> },
    /// Neither layout's marker field is present.
    Unrecognized,
}

impl<'a> ChunkSchema<'a> {
    /// Detect the schema. The legacy marker wins if both are present.
    pub fn classify(root: &'a Compound) -> Self {
        if root.contains_key(LEGACY_LEVEL) {
            let sections = root
                .get_compound(LEGACY_LEVEL)
                .and_then(|level| level.get_list(LEGACY_SECTIONS));
            ChunkSchema::Legacy { sections }
        } else if root.contains_key(MODERN_SECTIONS) {
            ChunkSchema::Modern {
                sections: root.get_list(MODERN_SECTIONS),
            }
        } else {
            ChunkSchema::Unrecognized
        }
    }

    /// Whether the chunk provably holds nothing worth keeping.
    pub fn is_empty(&self) -> bool {
        match self {
            // No `Sections` means too little information: keep.
            ChunkSchema::Legacy { sections } => sections.is_some_and(List::is_empty),
            ChunkSchema::Modern { sections } => {
                sections.is_some_and(|list| list.iter().all(section_is_air))
            }
            ChunkSchema::Unrecognized => false,
        }
    }
}

/// Classify a decoded chunk payload.
pub fn is_empty_chunk(root: &Compound) -> bool {
    ChunkSchema::classify(root).is_empty()
}

/// A modern section is air when its palette is exactly `[minecraft:air]` and
/// it carries no packed block data.
fn section_is_air(section: &Tag) -> bool {
    let Some(block_states) = section
        .as_compound()
        .and_then(|s| s.get_compound(BLOCK_STATES))
    else {
        return false;
    };
    let Some(palette) = block_states.get_list(PALETTE) else {
        return false;
    };
    if palette.len() != 1 {
        return false;
    }
    let only_air = palette
        .get(0)
        .and_then(Tag::as_compound)
        .and_then(|entry| entry.get_string(PALETTE_NAME))
        == Some(AIR_BLOCK);
    if !only_air {
        return false;
    }
    match block_states.get(PACKED_DATA) {
        None => true,
        Some(Tag::LongArray(data)) => data.is_empty(),
        Some(_) => false,
    }
}
