mod cli;
mod config;
mod document;
mod fetch;
mod job;
mod model;
mod storage;

use std::{io, process};

use tracing_subscriber::EnvFilter;

/// Env var holding the `tracing` filter directives, e.g. `RUNLOG_LOG=debug`.
const LOG_ENV: &str = "RUNLOG_LOG";

fn main() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
