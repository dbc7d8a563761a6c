use std::io::Write;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use faust_utils::{Cli, Config, commands};

fn init_logging(cli: &Cli) {
    // RUST_LOG wins over the command line verbosity
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.verbosity().filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli);

    let config = Config::load(&cli.config, &cli.config_overrides())
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&cli.command, &config, &mut out)?;
    out.flush()?;

    Ok(())
}
