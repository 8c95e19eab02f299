//! Command-line argument structures.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Environment variable consulted for the log level when `RUST_LOG` is unset.
pub const LOG_LEVEL_ENV: &str = "ANVIL_COMPACTOR_LOG";

/// Verbosity of the diagnostic log on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    /// One line per rewritten container (default)
    #[default]
    Info,
    /// Adds per-region copy counts and skipped directories
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored; `warning` is
    /// accepted for `warn`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = s.trim().to_ascii_lowercase();
        let level = if level == "warning" { "warn" } else { level.as_str() };
        <LogLevel as clap::ValueEnum>::from_str(level, true)
            .map_err(|_| format!("unknown log level `{}`", s.trim()))
    }
}

/// Anvil compactor - shrink a saved world in place
///
/// Rewrites the `region` directory without empty chunks, compacts the
/// `entities` and `poi` directories to the surviving chunks and clears the
/// player embedded in `level.dat`. Every rewritten container keeps its
/// original as a `.bak` sibling.
#[derive(Debug, Parser)]
#[command(name = "anvil-compactor")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// World directory to compact
    #[arg(value_name = "WORLD")]
    pub world: PathBuf,

    /// Keep chunks whose sections hold only air
    #[arg(long)]
    pub keep_empty_chunks: bool,

    /// Leave the player in level.dat untouched
    #[arg(long)]
    pub keep_player_data: bool,

    /// TOML file with compaction options (flags take precedence)
    #[arg(long, value_name = "FILE", env = "ANVIL_COMPACTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level for diagnostic output
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Log level after applying `ANVIL_COMPACTOR_LOG`, if it parses.
    pub fn effective_log_level(&self, env_value: Option<&str>) -> LogLevel {
        env_value
            .and_then(|value| value.parse().ok())
            .unwrap_or(self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // LogLevel tests
    // ==========================================================================

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_log_level_maps_to_level_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
        assert_eq!(LevelFilter::from(LogLevel::Info), LevelFilter::INFO);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" Debug ".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("TrAcE".parse::<LogLevel>(), Ok(LogLevel::Trace));
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!("".parse::<LogLevel>().is_err());
    }

    // ==========================================================================
    // Argument parsing tests
    // ==========================================================================

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["anvil-compactor", "saves/world"]).unwrap();
        assert_eq!(cli.world, PathBuf::from("saves/world"));
        assert!(!cli.keep_empty_chunks);
        assert!(!cli.keep_player_data);
        assert!(!cli.json);
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "anvil-compactor",
            "w",
            "--keep-empty-chunks",
            "--keep-player-data",
            "--config",
            "opts.toml",
            "--log-level",
            "debug",
            "--json",
        ])
        .unwrap();
        assert!(cli.keep_empty_chunks);
        assert!(cli.keep_player_data);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("opts.toml")));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_world_is_required() {
        assert!(Cli::try_parse_from(["anvil-compactor"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["anvil-compactor", "w", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_env_log_level_overrides_flag() {
        let cli = Cli::try_parse_from(["anvil-compactor", "w", "--log-level", "warn"]).unwrap();
        assert_eq!(cli.effective_log_level(Some("trace")), LogLevel::Trace);
        assert_eq!(cli.effective_log_level(Some("bogus")), LogLevel::Warn);
        assert_eq!(cli.effective_log_level(None), LogLevel::Warn);
    }
}
