//! Shelfmark CLI: page screenshots and home library organization.
//!
//! `capture` drives a headless browser through WebDriver; `organize` turns
//! inventory CSV exports into a shelf-by-shelf HTML guide.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
