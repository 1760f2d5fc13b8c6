use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    // stderr keeps stdout clean for layout documents
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    debug!(?cli, "parsed arguments");

    cli::run(cli)
}
