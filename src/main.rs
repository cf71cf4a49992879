// ABOUTME: Entry point for the dbr CLI application.
// ABOUTME: Installs logging, runs one session, and maps the outcome to an exit code.

mod cli;

use clap::Parser;
use cli::{Cli, LogFormat};
use dbr::config::SessionConfig;
use dbr::error::Result;
use dbr::session::Driver;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);
    match cli.log_format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }

    tracing::info!("starting");

    if let Err(e) = run(&cli).await {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = cli.apply(SessionConfig::from_lookup(|var| cli.lookup_env(var))?);
    Driver::new(config).run().await?;
    Ok(())
}
