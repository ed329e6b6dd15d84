use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use scroogecoin::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();
    info!("=== ScroogeCoin epoch processor ===");

    cli.handle_command().context("command failed")?;
    Ok(())
}
