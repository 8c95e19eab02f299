//! Compaction options and world layout constants.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

use crate::{CompactError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Backup suffix appended to a container or file name.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Directory holding chunk records. Every world has one.
pub const REGION_DIR: &str = "region";

/// Directories keyed by chunk coordinate that follow the region directory.
pub const DEFAULT_METADATA_DIRS: [&str; 2] = ["entities", "poi"];

/// Scalar world state file carrying the embedded player.
pub const LEVEL_DAT_FILE: &str = "level.dat";

// ============================================================================
// Configuration
// ============================================================================

/// Options for a world compaction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactOptions {
    /// Drop chunks whose sections hold only air.
    #[serde(default = "default_true")]
    pub avoid_empty_chunks: bool,

    /// Clear the embedded player in `level.dat`.
    #[serde(default = "default_true")]
    pub scrub_player_data: bool,

    /// Coordinate-keyed directories compacted against the retained chunks.
    #[serde(default = "default_metadata_dirs")]
    pub metadata_dirs: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_metadata_dirs() -> Vec<String> {
    DEFAULT_METADATA_DIRS.iter().map(|d| d.to_string()).collect()
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            avoid_empty_chunks: true,
            scrub_player_data: true,
            metadata_dirs: default_metadata_dirs(),
        }
    }
}

impl CompactOptions {
    /// Check that every metadata directory is a distinct plain name inside
    /// the world, other than the region directory.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in &self.metadata_dirs {
            let invalid = |reason| CompactError::InvalidMetadataDir {
                name: name.clone(),
                reason,
            };
            let mut components = Path::new(name).components();
            let single_normal = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !single_normal {
                return Err(invalid("must be a single directory name"));
            }
            if name == REGION_DIR {
                return Err(invalid("the region directory is compacted separately"));
            }
            if !seen.insert(name.as_str()) {
                return Err(invalid("listed more than once"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_options_defaults() {
        let options = CompactOptions::default();
        assert!(options.avoid_empty_chunks);
        assert!(options.scrub_player_data);
        assert_eq!(options.metadata_dirs, vec!["entities", "poi"]);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let options: CompactOptions =
            serde_json::from_str(r#"{ "avoid_empty_chunks": false }"#).unwrap();
        assert!(!options.avoid_empty_chunks);
        assert!(options.scrub_player_data);
        assert_eq!(options.metadata_dirs, vec!["entities", "poi"]);
    }

    fn with_dirs(dirs: &[&str]) -> CompactOptions {
        CompactOptions {
            metadata_dirs: dirs.iter().map(|d| d.to_string()).collect(),
            ..CompactOptions::default()
        }
    }

    #[test]
    fn test_default_metadata_dirs_are_valid() {
        assert!(CompactOptions::default().validate().is_ok());
        assert!(with_dirs(&[]).validate().is_ok());
    }

    #[test]
    fn test_metadata_dirs_must_be_plain_distinct_names() {
        for dirs in [
            &["poi", "poi"][..],
            &["region"],
            &["/tmp/x"],
            &["../poi"],
            &["a/b"],
            &["."],
            &[""],
        ] {
            let err = with_dirs(dirs).validate().unwrap_err();
            assert!(
                matches!(err, CompactError::InvalidMetadataDir { .. }),
                "{dirs:?} should be rejected"
            );
        }
    }
}
