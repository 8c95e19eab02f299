//! Integration tests for gzip-wrapped NBT files.

use std::io::Write;

use anvil_nbt::{Compound, NamedCompound, NbtError, Tag, read_gzip, write_gzip};
use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

fn level_dat() -> NamedCompound {
    let mut player = Compound::new();
    player.insert("Health", Tag::Float(20.0));
    player.insert("Dimension", Tag::String("minecraft:overworld".into()));
    let mut data = Compound::new();
    data.insert("LevelName", Tag::String("New World".into()));
    data.insert("Player", player);
    let mut root = Compound::new();
    root.insert("Data", data);
    NamedCompound::new("", root)
}

#[test]
fn test_write_then_read_gzip_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("level.dat");

    write_gzip(&path, &level_dat()).unwrap();
    let loaded = read_gzip(&path).unwrap();

    assert_eq!(loaded, level_dat());
    let player = loaded
        .root
        .get_compound("Data")
        .and_then(|d| d.get_compound("Player"))
        .unwrap();
    assert_eq!(player.len(), 2);
}

#[test]
fn test_read_gzip_accepts_foreign_encoder_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("level.dat");

    let raw = anvil_nbt::to_bytes(&level_dat()).unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&raw).unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();

    assert_eq!(read_gzip(&path).unwrap(), level_dat());
}

#[test]
fn test_read_gzip_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = read_gzip(temp_dir.path().join("nope.dat")).unwrap_err();
    assert!(matches!(err, NbtError::Io(_)));
}
