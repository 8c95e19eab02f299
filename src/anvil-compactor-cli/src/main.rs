//! Anvil compactor - main entry point.

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use anvil_compactor_cli::cli::{Cli, args::LOG_LEVEL_ENV, run};

fn init_logging(cli: &Cli) {
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let log_level = cli.effective_log_level(env_level.as_deref());

    let fallback = || EnvFilter::default().add_directive(LevelFilter::from(log_level).into());
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}
