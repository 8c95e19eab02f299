//! Anvil compactor CLI library module.
//!
//! - `cli/` - argument parsing, option resolution and the compaction handler

pub mod cli;
