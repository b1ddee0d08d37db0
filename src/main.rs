//! Lookout CLI - report files that changed under a directory
//!
//! Usage: lookout <COMMAND>
//!
//! Commands:
//!   watch   Watch a directory and print each batch of changed files
//!   files   List every non-ignored file
//!   scan    One scan for recently modified files

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Env var holding a tracing filter; overrides `-v`
const LOG_ENV: &str = "LOOKOUT_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Watch { args } => commands::watch::cmd_watch(&args, cli.json),
        Commands::Files { args } => commands::files::cmd_files(&args, cli.json),
        Commands::Scan {
            args,
            since_secs,
            shallow,
        } => commands::scan::cmd_scan(&args, since_secs, shallow, cli.json),
    }
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr so stdout stays machine-readable
fn init_tracing(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("lookout={}", default_level(verbose))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
