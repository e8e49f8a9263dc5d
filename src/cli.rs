//! CLI interface for runlog.
//!
//! Meant to be run by a scheduler: each subcommand is one run-to-completion
//! job. Progress lines go to stdout, diagnostics go through `tracing` to
//! stderr.
//!
//! - `runlog` or `runlog heartbeat`: bump the README counter and log a run.
//! - `runlog fetch`: download the configured files and log the batch.
//! - `runlog status`: show a log's counter and history without writing.
//! - `runlog init`: write default skeletons for logs that don't exist yet.
//!
//! Failed downloads are part of a normal run. Only configuration and local
//! write errors end the process with a non-zero status.

mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::Zoned;

use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::job;
use crate::model::Layout;
use crate::storage::Storage;

use format::{format_result, format_snapshot, format_summary};

/// runlog: keep a bounded run history in your README.
#[derive(Debug, Parser)]
#[command(name = "runlog", version, after_long_help = SCHEDULE_HELP)]
pub struct Cli {
    /// Config file. Falls back to `$RUNLOG_CONFIG`, `./runlog.toml`,
    /// then the per-user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Defaults to `heartbeat`.
    #[command(subcommand)]
    command: Option<Command>,
}

const SCHEDULE_HELP: &str = r#"Scheduling:
  */5 * * * *  cd /path/to/repo && runlog
  0 6 * * *    cd /path/to/repo && runlog fetch

Example runlog.toml:
  readme = "README.md"
  download-dir = "pdfs"
  download-log = "pdfs/DOWNLOAD_LOG.md"
  urls = ["https://example.com/paper.pdf"]
  timeout-secs = 30
  history-cap = 10

Set RUNLOG_LOG=debug for diagnostics on stderr."#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record one run: counter +1 and a new history entry in the README.
    Heartbeat,

    /// Download every configured URL and record the batch in the download log.
    ///
    /// Files whose content is unchanged are not rewritten.
    /// Failed downloads are logged and don't fail the command.
    Fetch,

    /// Show a log's counter, last update and history size.
    Status {
        /// Inspect the download log instead of the README.
        #[arg(long)]
        downloads: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Create missing log documents and the download folder.
    Init,
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;
    let storage = Storage::new(".");

    match cli.command.unwrap_or(Command::Heartbeat) {
        Command::Heartbeat => cmd_heartbeat(&storage, &config),
        Command::Fetch => cmd_fetch(&storage, &config),
        Command::Status { downloads, json } => cmd_status(&storage, &config, downloads, json),
        Command::Init => cmd_init(&storage, &config),
    }
}

fn cmd_heartbeat(storage: &Storage, config: &Config) -> Result<(), String> {
    let now = Zoned::now();

    println!("🤖 Hi, I am a cron job!");
    println!("⏰ Current time: {}", now.strftime("%Y-%m-%d %H:%M:%S"));
    println!("📝 Updating {} with new run log...", config.readme.display());

    let report = job::heartbeat(storage, config, &now).map_err(|e| format!("heartbeat failed: {e}"))?;

    println!(
        "✅ {} updated! Run #{} logged at {}",
        report.document.display(),
        report.ordinal,
        now.strftime("%Y-%m-%d %H:%M:%S")
    );
    println!("🎉 All done!");
    Ok(())
}

fn cmd_fetch(storage: &Storage, config: &Config) -> Result<(), String> {
    let now = Zoned::now();

    if config.urls.is_empty() {
        println!("⚠️ No URLs configured; recording an empty batch.");
    } else {
        println!(
            "📥 Fetching {} file(s) into {}",
            config.urls.len(),
            config.download_dir.display()
        );
    }

    let fetcher = HttpFetcher::new(config.timeout(), config.user_agent.as_str());
    let report = job::fetch(storage, config, &fetcher, &now).map_err(|e| format!("fetch failed: {e}"))?;

    for result in &report.results {
        println!("  {}", format_result(result));
    }
    println!("📊 {}", format_summary(&report.summary));
    println!(
        "📝 {} updated! Batch #{} logged ({}: {})",
        report.log.document.display(),
        report.log.ordinal,
        Layout::DOWNLOADS.counter_label,
        report.log.total
    );
    Ok(())
}

fn cmd_status(storage: &Storage, config: &Config, downloads: bool, json: bool) -> Result<(), String> {
    let (path, layout) = if downloads {
        (&config.download_log, Layout::DOWNLOADS)
    } else {
        (&config.readme, Layout::HEARTBEAT)
    };

    let snapshot = job::snapshot(storage, path, &layout).map_err(|e| format!("status failed: {e}"))?;

    if json {
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("failed to serialize status: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if !snapshot.exists {
        println!("No log at {} (run `runlog init` to create one)", path.display());
        return Ok(());
    }

    println!("{}", format_snapshot(&snapshot));
    Ok(())
}

fn cmd_init(storage: &Storage, config: &Config) -> Result<(), String> {
    let created = job::init(storage, config).map_err(|e| format!("init failed: {e}"))?;

    if created.is_empty() {
        println!("Nothing to do: all logs exist");
        return Ok(());
    }
    for path in &created {
        println!("Created {}", path.display());
    }
    Ok(())
}
