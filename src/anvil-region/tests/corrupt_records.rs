//! Integration tests for damaged region files.

use std::fs;
use std::path::Path;

use anvil_region::{ChunkPos, RegionDir, RegionError, RegionPos, SECTOR_BYTES};
use tempfile::TempDir;

/// Region file with one location entry at slot 0 and the given body sectors.
fn write_region(dir: &Path, location: u32, body: &[u8]) {
    let mut bytes = vec![0u8; 2 * SECTOR_BYTES];
    bytes[..4].copy_from_slice(&location.to_be_bytes());
    bytes.extend_from_slice(body);
    fs::write(dir.join(RegionPos::new(0, 0).file_name()), bytes).unwrap();
}

fn record(length: u32, compression: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = length.to_be_bytes().to_vec();
    out.push(compression);
    out.extend_from_slice(payload);
    out.resize(out.len().div_ceil(SECTOR_BYTES) * SECTOR_BYTES, 0);
    out
}

fn read_origin(dir: &Path) -> anvil_region::Result<Option<anvil_region::ChunkData>> {
    RegionDir::open_read(dir).unwrap().read(ChunkPos::new(0, 0))
}

#[test]
fn test_location_inside_header_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    write_region(temp_dir.path(), (1 << 8) | 1, &[]);
    let err = read_origin(temp_dir.path()).unwrap_err();
    assert!(matches!(err, RegionError::CorruptChunk { .. }));
    assert!(err.is_record_local());
}

#[test]
fn test_location_past_end_of_file_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    write_region(temp_dir.path(), (40 << 8) | 1, &[]);
    assert!(matches!(
        read_origin(temp_dir.path()),
        Err(RegionError::CorruptChunk { .. })
    ));
}

#[test]
fn test_length_overrunning_allocation_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    write_region(temp_dir.path(), (2 << 8) | 1, &record(9000, 2, &[1, 2, 3]));
    assert!(matches!(
        read_origin(temp_dir.path()),
        Err(RegionError::CorruptChunk { .. })
    ));
}

#[test]
fn test_zero_length_record_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    write_region(temp_dir.path(), (2 << 8) | 1, &record(0, 2, &[]));
    assert!(matches!(
        read_origin(temp_dir.path()),
        Err(RegionError::CorruptChunk { .. })
    ));
}

#[test]
fn test_missing_external_file_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    write_region(temp_dir.path(), (2 << 8) | 1, &record(1, 0x82, &[]));
    assert!(matches!(
        read_origin(temp_dir.path()),
        Err(RegionError::CorruptChunk { .. })
    ));
}

#[test]
fn test_valid_record_next_to_corrupt_one_still_reads() {
    let temp_dir = TempDir::new().unwrap();
    let mut bytes = vec![0u8; 2 * SECTOR_BYTES];
    bytes[..4].copy_from_slice(&((1u32 << 8) | 1).to_be_bytes());
    bytes[4..8].copy_from_slice(&((2u32 << 8) | 1).to_be_bytes());
    bytes.extend_from_slice(&record(4, 3, b"abc"));
    fs::write(temp_dir.path().join("r.0.0.mca"), bytes).unwrap();

    let mut source = RegionDir::open_read(temp_dir.path()).unwrap();
    assert!(source.read(ChunkPos::new(0, 0)).is_err());
    let chunk = source.read(ChunkPos::new(1, 0)).unwrap().unwrap();
    assert_eq!(chunk.payload, b"abc".to_vec());
    assert_eq!(chunk.decompress().unwrap(), b"abc".to_vec());
}

#[test]
fn test_truncated_header_reads_as_empty_region() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("r.0.0.mca"), vec![0xFFu8; 100]).unwrap();

    let mut source = RegionDir::open_read(temp_dir.path()).unwrap();
    assert_eq!(source.regions().unwrap(), vec![RegionPos::new(0, 0)]);
    assert!(source.chunks_in(RegionPos::new(0, 0), false).unwrap().is_empty());
    assert_eq!(source.read(ChunkPos::new(0, 0)).unwrap(), None);
}
