//! Removal of the embedded single-player state from `level.dat`.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use anvil_nbt::{Compound, read_gzip, write_gzip};

use crate::Result;
use crate::backup::swap_to_backup;

const DATA_KEY: &str = "Data";
const PLAYER_KEY: &str = "Player";

/// What the scrubber did with `level.dat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScrubOutcome {
    /// Scrubbing was switched off.
    Disabled,
    /// The world has no `level.dat`.
    Missing,
    /// The player compound was already empty; nothing was touched.
    AlreadyClean,
    /// The player compound was cleared and the original kept as `backup`.
    Scrubbed {
        backup: PathBuf,
        fields_removed: usize,
    },
}

/// Clears the `Player` compound embedded in a gzip NBT state file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerDataScrubber;

impl PlayerDataScrubber {
    pub fn new() -> Self {
        Self
    }

    /// Clear the player compound in the file at `path`.
    ///
    /// A file whose player compound is already empty (or absent) is left
    /// alone and no backup is made. Otherwise the original is renamed to its
    /// backup and the cleared document is written at `path`.
    pub fn scrub(&self, path: &Path) -> Result<ScrubOutcome> {
        let mut doc = read_gzip(path)?;
        let fields = player_compound(&mut doc.root).map_or(0, |p| p.len());
        if fields == 0 {
            debug!(path = %path.display(), "Player data already empty");
            return Ok(ScrubOutcome::AlreadyClean);
        }

        let swap = swap_to_backup(path)?;
        if let Some(player) = player_compound(&mut doc.root) {
            *player = Compound::new();
        }
        write_gzip(&swap.target, &doc)?;

        info!(
            path = %path.display(),
            fields_removed = fields,
            "Cleared embedded player data"
        );
        Ok(ScrubOutcome::Scrubbed {
            backup: swap.backup,
            fields_removed: fields,
        })
    }
}

/// The player compound: `Data.Player` in the usual layout, or a top-level
/// `Player` when the root has no `Data` compound.
fn player_compound(root: &mut Compound) -> Option<&mut Compound> {
    if root.get_compound(DATA_KEY).is_some() {
        root.get_compound_mut(DATA_KEY)?.get_compound_mut(PLAYER_KEY)
    } else {
        root.get_compound_mut(PLAYER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompactError;
    use anvil_nbt::{NamedCompound, Tag};
    use std::fs;
    use tempfile::TempDir;

    fn level(player: Compound) -> NamedCompound {
        let mut data = Compound::new();
        data.insert("LevelName", Tag::from("Test"));
        data.insert("Player", player);
        let mut root = Compound::new();
        root.insert("Data", data);
        NamedCompound::new("", root)
    }

    fn some_player() -> Compound {
        let mut player = Compound::new();
        player.insert("Health", Tag::Float(20.0));
        player.insert("XpLevel", Tag::Int(30));
        player
    }

    #[test]
    fn test_scrub_clears_player_and_keeps_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("level.dat");
        write_gzip(&path, &level(some_player())).unwrap();

        let outcome = PlayerDataScrubber::new().scrub(&path).unwrap();

        let backup = temp_dir.path().join("level.dat.bak");
        assert_eq!(
            outcome,
            ScrubOutcome::Scrubbed {
                backup: backup.clone(),
                fields_removed: 2
            }
        );
        assert_eq!(read_gzip(&backup).unwrap(), level(some_player()));
        let scrubbed = read_gzip(&path).unwrap();
        assert_eq!(scrubbed, level(Compound::new()));
    }

    #[test]
    fn test_empty_player_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("level.dat");
        write_gzip(&path, &level(Compound::new())).unwrap();
        let before = fs::read(&path).unwrap();

        let outcome = PlayerDataScrubber::new().scrub(&path).unwrap();

        assert_eq!(outcome, ScrubOutcome::AlreadyClean);
        assert!(!temp_dir.path().join("level.dat.bak").exists());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_existing_backup_blocks_scrub() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("level.dat");
        write_gzip(&path, &level(some_player())).unwrap();
        fs::write(temp_dir.path().join("level.dat.bak"), b"previous").unwrap();

        let err = PlayerDataScrubber::new().scrub(&path).unwrap_err();

        assert!(matches!(err, CompactError::BackupAlreadyExists(_)));
        assert_eq!(read_gzip(&path).unwrap(), level(some_player()));
    }

    #[test]
    fn test_root_level_player_without_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("level.dat");
        let root: Compound = [("Player", Tag::from(some_player()))].into_iter().collect();
        write_gzip(&path, &NamedCompound::new("", root)).unwrap();

        PlayerDataScrubber::new().scrub(&path).unwrap();

        let scrubbed = read_gzip(&path).unwrap();
        assert_eq!(scrubbed.root.get_compound("Player"), Some(&Compound::new()));
    }

    #[test]
    fn test_missing_player_counts_as_clean() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("level.dat");
        let data: Compound = [("LevelName", Tag::from("x"))].into_iter().collect();
        let root: Compound = [("Data", Tag::from(data))].into_iter().collect();
        write_gzip(&path, &NamedCompound::new("", root)).unwrap();

        assert_eq!(
            PlayerDataScrubber::new().scrub(&path).unwrap(),
            ScrubOutcome::AlreadyClean
        );
    }
}
