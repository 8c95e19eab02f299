//! A single `.mca` region file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::SECTOR_BYTES;
use crate::chunk::{ChunkData, CompressionScheme, EXTERNAL_FLAG};
use crate::error::{RegionError, Result};
use crate::pos::{CHUNKS_PER_REGION, ChunkPos};

const HEADER_BYTES: usize = 2 * SECTOR_BYTES;
const HEADER_SECTORS: u32 = 2;
/// Record prefix: 4-byte length plus the compression byte.
const RECORD_PREFIX: usize = 5;
const MAX_INLINE_SECTORS: usize = 255;

#[derive(Debug)]
pub(crate) struct RegionFile {
    path: PathBuf,
    file: File,
    locations: Vec<u32>,
    timestamps: Vec<u32>,
    /// First free sector at the end of the file.
    end_sector: u32,
    writable: bool,
    dirty: bool,
}

impl RegionFile {
    /// Open an existing region file. `writable` also allows [`write`](Self::write).
    pub(crate) fn open(path: &Path, writable: bool) -> Result<Self> {
        let mut file = OpenOptions::new().read(true).write(writable).open(path)?;
        let len = file.metadata()?.len();

        let mut locations = vec![0u32; CHUNKS_PER_REGION];
        let mut timestamps = vec![0u32; CHUNKS_PER_REGION];
        if len < HEADER_BYTES as u64 {
            warn!(
                path = %path.display(),
                len,
                "Region file shorter than its header, treating as empty"
            );
        } else {
            let mut header = vec![0u8; HEADER_BYTES];
            file.read_exact(&mut header)?;
            decode_table(&header[..SECTOR_BYTES], &mut locations);
            decode_table(&header[SECTOR_BYTES..], &mut timestamps);
        }

        let end_sector = (len.div_ceil(SECTOR_BYTES as u64) as u32).max(HEADER_SECTORS);
        Ok(Self {
            path: path.to_path_buf(),
            file,
            locations,
            timestamps,
            end_sector,
            writable,
            dirty: false,
        })
    }

    /// Create a new, empty region file, replacing any file at `path`.
    pub(crate) fn create(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.write_all(&[0u8; HEADER_BYTES])?;
        debug!(path = %path.display(), "Created region file");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            locations: vec![0; CHUNKS_PER_REGION],
            timestamps: vec![0; CHUNKS_PER_REGION],
            end_sector: HEADER_SECTORS,
            writable: true,
            dirty: false,
        })
    }

    pub(crate) fn has_chunk(&self, pos: ChunkPos) -> bool {
        self.locations[pos.local_index()] != 0
    }

    pub(crate) fn read(&mut self, dir: &Path, pos: ChunkPos) -> Result<Option<ChunkData>> {
        let index = pos.local_index();
        let location = self.locations[index];
        if location == 0 {
            return Ok(None);
        }
        let offset = location >> 8;
        let sectors = (location & 0xFF) as usize;
        if offset < HEADER_SECTORS || sectors == 0 {
            return Err(RegionError::corrupt(
                pos,
                format!("invalid location (offset {offset}, {sectors} sectors)"),
            ));
        }

        let start = offset as u64 * SECTOR_BYTES as u64;
        let file_len = self.file.metadata()?.len();
        if start + RECORD_PREFIX as u64 > file_len {
            return Err(RegionError::corrupt(pos, "record starts past end of file"));
        }

        self.file.seek(SeekFrom::Start(start))?;
        let mut prefix = [0u8; RECORD_PREFIX];
        self.file.read_exact(&mut prefix)?;
        let length = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        let compression_byte = prefix[4];
        if length == 0 {
            return Err(RegionError::corrupt(pos, "zero-length record"));
        }

        let timestamp = self.timestamps[index];
        if compression_byte & EXTERNAL_FLAG != 0 {
            let external = dir.join(pos.external_file_name());
            let payload = match fs::read(&external) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(RegionError::corrupt(
                        pos,
                        format!("missing external file {}", external.display()),
                    ));
                }
                Err(e) => return Err(e.into()),
            };
            let compression = CompressionScheme::from_id(compression_byte & !EXTERNAL_FLAG);
            return Ok(Some(ChunkData::new(compression, payload, timestamp)));
        }

        let payload_len = length - 1;
        if payload_len + RECORD_PREFIX > sectors * SECTOR_BYTES {
            return Err(RegionError::corrupt(
                pos,
                format!("length {length} overruns {sectors} allocated sectors"),
            ));
        }
        if start + (RECORD_PREFIX + payload_len) as u64 > file_len {
            return Err(RegionError::corrupt(pos, "record runs past end of file"));
        }

        let mut payload = vec![0u8; payload_len];
        self.file.read_exact(&mut payload)?;
        Ok(Some(ChunkData::new(
            CompressionScheme::from_id(compression_byte),
            payload,
            timestamp,
        )))
    }

    pub(crate) fn write(&mut self, dir: &Path, pos: ChunkPos, chunk: &ChunkData) -> Result<()> {
        if !self.writable {
            return Err(RegionError::ReadOnly(self.path.clone()));
        }
        let index = pos.local_index();
        let external_path = dir.join(pos.external_file_name());

        let inline_sectors = (RECORD_PREFIX + chunk.payload.len()).div_ceil(SECTOR_BYTES);
        let (record, sectors) = if inline_sectors > MAX_INLINE_SECTORS {
            write_external(&external_path, &chunk.payload)?;
            let mut record = Vec::with_capacity(RECORD_PREFIX);
            record.extend_from_slice(&1u32.to_be_bytes());
            record.push(chunk.compression.id() | EXTERNAL_FLAG);
            (record, 1)
        } else {
            if external_path.exists() {
                fs::remove_file(&external_path)?;
            }
            let mut record = Vec::with_capacity(inline_sectors * SECTOR_BYTES);
            record.extend_from_slice(&((chunk.payload.len() + 1) as u32).to_be_bytes());
            record.push(chunk.compression.id());
            record.extend_from_slice(&chunk.payload);
            (record, inline_sectors)
        };

        let current = self.locations[index];
        let reusable = current >> 8 >= HEADER_SECTORS && (current & 0xFF) as usize >= sectors;
        let offset = if reusable {
            current >> 8
        } else {
            let offset = self.end_sector;
            self.end_sector += sectors as u32;
            offset
        };

        let mut padded = record;
        padded.resize(sectors * SECTOR_BYTES, 0);
        let start = offset as u64 * SECTOR_BYTES as u64;
        self.file.seek(SeekFrom::Start(start))?;
        self.file.write_all(&padded)?;

        self.locations[index] = (offset << 8) | sectors as u32;
        self.timestamps[index] = chunk.timestamp;
        self.dirty = true;
        Ok(())
    }

    /// Write the header tables back if anything changed, then sync.
    pub(crate) fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let mut header = Vec::with_capacity(HEADER_BYTES);
        for value in self.locations.iter().chain(self.timestamps.iter()) {
            header.extend_from_slice(&value.to_be_bytes());
        }
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header)?;
        self.file.sync_all()?;
        self.dirty = false;
        debug!(path = %self.path.display(), "Flushed region header");
        Ok(())
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

fn decode_table(bytes: &[u8], out: &mut [u32]) {
    for (slot, raw) in out.iter_mut().zip(bytes.chunks_exact(4)) {
        *slot = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
    }
}

fn write_external(path: &Path, payload: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()?;
    Ok(())
}
