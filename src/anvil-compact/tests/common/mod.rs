//! Shared fixtures: chunk payloads, containers and worlds on disk.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use anvil_nbt::{Compound, List, NamedCompound, Tag, TagType, write_gzip};
use anvil_region::{ChunkData, ChunkPos, CompressionScheme, RegionDir};

pub const AIR: &str = "minecraft:air";

fn section(palette: &[&str], data: Option<Vec<i64>>) -> Compound {
    let entries = palette.iter().map(|name| {
        let entry: Compound = [("Name", Tag::from(*name))].into_iter().collect();
        entry
    });
    let mut block_states = Compound::new();
    block_states.insert("palette", List::of_compounds(entries));
    if let Some(data) = data {
        block_states.insert("data", Tag::LongArray(data));
    }
    let mut section = Compound::new();
    section.insert("Y", Tag::Byte(-4));
    section.insert("block_states", block_states);
    section
}

fn modern(sections: Vec<Compound>) -> Compound {
    let mut root = Compound::new();
    root.insert("DataVersion", Tag::Int(3700));
    root.insert("Status", Tag::from("minecraft:full"));
    root.insert("sections", List::of_compounds(sections));
    root
}

/// 1.18+ chunk whose sections are all air.
pub fn modern_air() -> Compound {
    modern(vec![section(&[AIR], None), section(&[AIR], Some(vec![]))])
}

/// 1.18+ chunk with one section holding stone.
pub fn modern_solid() -> Compound {
    modern(vec![
        section(&[AIR], None),
        section(&[AIR, "minecraft:stone"], Some(vec![0x1111_2222_3333_4444])),
    ])
}

/// Pre-1.18 chunk with `sections` entries under `Level.Sections`.
pub fn legacy(sections: usize) -> Compound {
    let mut level = Compound::new();
    level.insert("xPos", Tag::Int(0));
    level.insert("zPos", Tag::Int(0));
    let list = if sections == 0 {
        List::empty(TagType::Compound)
    } else {
        List::of_compounds((0..sections).map(|y| {
            let s: Compound = [("Y", Tag::Byte(y as i8))].into_iter().collect();
            s
        }))
    };
    level.insert("Sections", list);
    [("Level", Tag::from(level))].into_iter().collect()
}

/// Chunk in a layout no known schema matches.
pub fn unknown_schema() -> Compound {
    [("Mystery", Tag::Int(1))].into_iter().collect()
}

pub fn encode(root: Compound) -> ChunkData {
    let raw = anvil_nbt::to_bytes(&NamedCompound::new("", root)).unwrap();
    ChunkData::compress(CompressionScheme::Zlib, &raw, 1_700_000_000).unwrap()
}

/// Opaque metadata record (entities/poi payloads are never decoded).
pub fn opaque(seed: u8) -> ChunkData {
    ChunkData::new(CompressionScheme::Zlib, vec![seed; 64], 42)
}

pub fn write_container(dir: &Path, chunks: &[(ChunkPos, ChunkData)]) {
    let mut dest = RegionDir::create(dir).unwrap();
    for (pos, chunk) in chunks {
        dest.write(*pos, chunk).unwrap();
    }
    dest.close().unwrap();
}

pub fn read_container(dir: &Path) -> BTreeMap<ChunkPos, ChunkData> {
    let mut source = RegionDir::open_read(dir).unwrap();
    let mut out = BTreeMap::new();
    for region in source.regions().unwrap() {
        for pos in source.chunks_in(region, false).unwrap() {
            if let Some(chunk) = source.read(pos).unwrap() {
                out.insert(pos, chunk);
            }
        }
    }
    source.close().unwrap();
    out
}

pub fn write_level_dat(world: &Path, player_fields: usize) {
    let player: Compound = (0..player_fields)
        .map(|i| (format!("field{i}"), Tag::Int(i as i32)))
        .collect();
    let mut data = Compound::new();
    data.insert("LevelName", Tag::from("fixture"));
    data.insert("Player", player);
    let root: Compound = [("Data", Tag::from(data))].into_iter().collect();
    write_gzip(world.join("level.dat"), &NamedCompound::new("", root)).unwrap();
}
