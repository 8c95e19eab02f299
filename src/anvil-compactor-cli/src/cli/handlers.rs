//! Option resolution and the compaction run.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use anvil_compact::{CompactOptions, ContainerReport, ScrubOutcome, WorldCompactor, WorldReport};

use super::args::Cli;

/// Read compaction options from a TOML file, or the defaults without one.
pub fn load_options(path: Option<&Path>) -> Result<CompactOptions> {
    let Some(path) = path else {
        return Ok(CompactOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Apply command-line flags on top of options loaded from a file.
///
/// Flags only ever switch features off, so an absent flag keeps the file value.
pub fn resolve_options(mut options: CompactOptions, cli: &Cli) -> CompactOptions {
    if cli.keep_empty_chunks {
        options.avoid_empty_chunks = false;
    }
    if cli.keep_player_data {
        options.scrub_player_data = false;
    }
    options
}

/// Compact the world named on the command line and print the outcome.
pub fn run(cli: &Cli) -> Result<()> {
    let options = resolve_options(load_options(cli.config.as_deref())?, cli);
    tracing::debug!(?options, "Resolved compaction options");

    let report = WorldCompactor::new(options)
        .run(&cli.world)
        .with_context(|| format!("Failed to compact world {}", cli.world.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_summary(&report));
    }
    Ok(())
}

/// Human-readable summary of a finished run.
pub fn format_summary(report: &WorldReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Compacted {}", report.world.display());
    let _ = writeln!(out, "{}", "=".repeat(50));
    container_line(&mut out, &report.region);
    let _ = writeln!(out, "  Retained chunks: {}", report.retained_chunks);
    for container in &report.metadata {
        container_line(&mut out, container);
    }
    let player = match &report.player_data {
        ScrubOutcome::Disabled => "kept (scrub disabled)".to_string(),
        ScrubOutcome::Missing => "no level.dat".to_string(),
        ScrubOutcome::AlreadyClean => "already empty".to_string(),
        ScrubOutcome::Scrubbed {
            backup,
            fields_removed,
        } => format!(
            "cleared {fields_removed} fields (backup: {})",
            backup.display()
        ),
    };
    let _ = writeln!(out, "  Player data: {player}");
    let _ = writeln!(out, "Finished in {} ms", report.duration_ms);
    out
}

fn container_line(out: &mut String, container: &ContainerReport) {
    let name = container
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| container.path.display().to_string());
    let _ = writeln!(
        out,
        "  {name}: kept {} of {} chunks, {} corrupt skipped (backup: {})",
        container.stats.copied,
        container.stats.copied + container.stats.rejected + container.stats.filtered_out,
        container.stats.corrupt_skipped,
        container.backup.display()
    );
}
