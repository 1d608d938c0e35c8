// menu-profit - main.rs
// Loads configuration, installs logging, then hands off to the CLI dispatcher.

use clap::Parser;
use menu_profit::cli::{dispatch, Cli};
use menu_profit::config_loader::load_config;
use std::process::exit;

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            exit(2);
        }
    };

    // validate() already checked the level parses
    let level = config.tracing_level().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli, config) {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
