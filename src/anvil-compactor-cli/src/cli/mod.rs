//! CLI argument parsing and command dispatch.
//!
//! # Module Structure
//!
//! - `args` - Command-line argument structures
//! - `handlers` - Option resolution, the compaction run and its summary

pub mod args;
pub mod handlers;

pub use args::{Cli, LogLevel};
pub use handlers::{load_options, resolve_options, run};
