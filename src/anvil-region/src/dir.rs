//! A directory of region files exposed as one container.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::chunk::ChunkData;
use crate::error::{RegionError, Result};
use crate::file::RegionFile;
use crate::pos::{ChunkPos, RegionPos};

/// How a [`RegionDir`] was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

/// Container over a directory of `r.<x>.<z>.mca` files.
///
/// Region files are opened lazily and kept open until [`close`](Self::close).
/// In [`OpenMode::Write`] a region file is created the first time a chunk is
/// written to it, so regions that receive no chunks leave no file behind.
#[derive(Debug)]
pub struct RegionDir {
    path: PathBuf,
    mode: OpenMode,
    /// `None` caches "no file for this region".
    files: HashMap<RegionPos, Option<RegionFile>>,
    closed: bool,
}

impl RegionDir {
    /// Open an existing directory for reading.
    pub fn open_read(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(RegionError::NotADirectory(path));
        }
        Ok(Self::with_mode(path, OpenMode::Read))
    }

    /// Open a directory for writing, creating it if needed.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Ok(Self::with_mode(path, OpenMode::Write))
    }

    fn with_mode(path: PathBuf, mode: OpenMode) -> Self {
        debug!(path = %path.display(), ?mode, "Opened region directory");
        Self {
            path,
            mode,
            files: HashMap::new(),
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Regions that have a file in this directory, sorted.
    ///
    /// Symlinked region files are followed. Names that look like region files
    /// but are not in canonical form are skipped with a warning, since their
    /// chunks could not be addressed.
    pub fn regions(&self) -> Result<Vec<RegionPos>> {
        let mut regions = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let looks_like_region = name.starts_with("r.") && name.ends_with(".mca");
            if !looks_like_region {
                continue;
            }
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %entry.path().display(), "Skipping dangling region symlink");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
            match RegionPos::from_file_name(name) {
                Some(region) => regions.push(region),
                None => warn!(
                    path = %entry.path().display(),
                    "Skipping region file with a non-canonical name"
                ),
            }
        }
        regions.sort();
        Ok(regions)
    }

    /// Chunk coordinates of a region.
    ///
    /// With `include_empty` every addressable slot is returned whether or not
    /// it holds a record; otherwise only slots with a header entry.
    pub fn chunks_in(&mut self, region: RegionPos, include_empty: bool) -> Result<Vec<ChunkPos>> {
        if include_empty {
            return Ok(region.chunks().collect());
        }
        let Some(file) = self.file_for(region, false)? else {
            return Ok(Vec::new());
        };
        Ok(region.chunks().filter(|pos| file.has_chunk(*pos)).collect())
    }

    /// Read a chunk record. `None` when the slot is empty.
    pub fn read(&mut self, pos: ChunkPos) -> Result<Option<ChunkData>> {
        let dir = self.path.clone();
        match self.file_for(pos.region(), false)? {
            Some(file) => file.read(&dir, pos),
            None => Ok(None),
        }
    }

    /// Write a chunk record, replacing any record already in the slot.
    pub fn write(&mut self, pos: ChunkPos, chunk: &ChunkData) -> Result<()> {
        if self.mode == OpenMode::Read {
            return Err(RegionError::ReadOnly(self.path.clone()));
        }
        let dir = self.path.clone();
        match self.file_for(pos.region(), true)? {
            Some(file) => file.write(&dir, pos, chunk),
            None => Err(RegionError::ReadOnly(self.path.clone())),
        }
    }

    /// Flush every region file's header and release the handles.
    pub fn close(mut self) -> Result<()> {
        self.flush_all()
    }

    fn flush_all(&mut self) -> Result<()> {
        self.closed = true;
        let mut first_error = None;
        for mut file in self.files.drain().filter_map(|(_, file)| file) {
            if let Err(e) = file.flush() {
                warn!(path = %file.path().display(), error = %e, "Failed to flush region file");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn file_for(&mut self, region: RegionPos, create: bool) -> Result<Option<&mut RegionFile>> {
        let needs_open = match self.files.get(&region) {
            None => true,
            Some(None) => create,
            Some(Some(_)) => false,
        };
        if needs_open {
            let path = self.path.join(region.file_name());
            let writable = self.mode == OpenMode::Write;
            let file = if path.is_file() {
                Some(RegionFile::open(&path, writable)?)
            } else if create && writable {
                Some(RegionFile::create(&path)?)
            } else {
                None
            };
            self.files.insert(region, file);
        }
        Ok(self.files.get_mut(&region).and_then(Option::as_mut))
    }
}

impl Drop for RegionDir {
    fn drop(&mut self) {
        if !self.closed
            && let Err(e) = self.flush_all()
        {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Region directory dropped with unflushed data"
            );
        }
    }
}
