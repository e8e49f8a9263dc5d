//! Jobs: one heartbeat or fetch run, from loading the log to writing it back.
//!
//! Every job reads its document once (or starts from the layout's skeleton),
//! rewrites it in memory and persists it with a single write. Time is passed
//! in so runs are reproducible.

use std::path::{Path, PathBuf};

use jiff::Zoned;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::document;
use crate::fetch::{self, Fetch};
use crate::model::{
    EntryStatus, FetchOutcome, FetchResult, FetchSummary, HistoryEntry, Layout, format_size,
};
use crate::storage::{Result, Storage};

const HEARTBEAT_ACTION: &str = "- **Action:** README updated automatically";

/// What a run wrote to its log document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub document: PathBuf,
    /// Counter value after the run.
    pub total: u64,
    /// Ordinal of the history entry the run added.
    pub ordinal: u64,
}

/// A fetch run: per-URL results plus the log update.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub results: Vec<FetchResult>,
    pub summary: FetchSummary,
    pub log: RunReport,
}

/// Read-only view of a log document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    pub document: PathBuf,
    pub exists: bool,
    pub counter_label: String,
    pub total: u64,
    pub last_updated: Option<String>,
    pub entries: usize,
    pub latest_entry: Option<u64>,
}

/// Record one heartbeat: counter +1 and a new run entry in the README.
pub fn heartbeat(storage: &Storage, config: &Config, now: &Zoned) -> Result<RunReport> {
    let layout = Layout::HEARTBEAT;
    let path = &config.readme;

    let current = load_or_skeleton(storage, path, &layout)?;
    let updated = document::update(&current, &layout, now, 1);

    let entry = HistoryEntry {
        title: layout.entry_title.to_string(),
        ordinal: updated.total,
        at: now.clone(),
        status: EntryStatus::Success,
        lines: vec![HEARTBEAT_ACTION.to_string()],
    };
    let rewritten = document::append_entry(&updated.document, &layout, &entry, config.history_cap());
    storage.save_document(path, &rewritten)?;

    info!(path = %path.display(), total = updated.total, "heartbeat recorded");
    Ok(RunReport {
        document: path.clone(),
        total: updated.total,
        ordinal: entry.ordinal,
    })
}

/// Download every configured URL, then record the batch in the download log.
pub fn fetch(
    storage: &Storage,
    config: &Config,
    fetcher: &impl Fetch,
    now: &Zoned,
) -> Result<FetchReport> {
    let results = fetch::fetch_all(fetcher, &config.urls, storage, &config.download_dir)?;
    let log = record_fetch(storage, config, &results, now)?;
    Ok(FetchReport {
        summary: FetchSummary::from_results(&results),
        results,
        log,
    })
}

/// Add a batch of fetch results to the download log.
///
/// The counter grows by the number of successful fetches. Batches are
/// numbered from the newest entry already in the log.
pub fn record_fetch(
    storage: &Storage,
    config: &Config,
    results: &[FetchResult],
    now: &Zoned,
) -> Result<RunReport> {
    let layout = Layout::DOWNLOADS;
    let path = &config.download_log;
    let summary = FetchSummary::from_results(results);

    let current = load_or_skeleton(storage, path, &layout)?;
    let ordinal = document::latest_ordinal(&current).unwrap_or(0) + 1;
    let updated = document::update(&current, &layout, now, summary.succeeded as u64);

    let entry = HistoryEntry {
        title: layout.entry_title.to_string(),
        ordinal,
        at: now.clone(),
        status: EntryStatus::from_counts(summary.succeeded, summary.attempted),
        lines: batch_lines(&summary, results),
    };
    let rewritten = document::append_entry(&updated.document, &layout, &entry, config.history_cap());
    storage.save_document(path, &rewritten)?;

    info!(
        path = %path.display(),
        batch = ordinal,
        succeeded = summary.succeeded,
        failed = summary.failed,
        total = updated.total,
        "download batch recorded"
    );
    Ok(RunReport {
        document: path.clone(),
        total: updated.total,
        ordinal,
    })
}

/// Inspect a log document without changing it.
pub fn snapshot(storage: &Storage, path: &Path, layout: &Layout) -> Result<Snapshot> {
    let current = storage.load_document(path)?;
    let text = current.as_deref().unwrap_or_default();
    Ok(Snapshot {
        document: path.to_path_buf(),
        exists: current.is_some(),
        counter_label: layout.counter_label.to_string(),
        total: document::read_counter(text, layout),
        last_updated: document::read_last_updated(text),
        entries: document::count_entries(text),
        latest_entry: document::latest_ordinal(text),
    })
}

/// Write the skeleton of each missing document and create the download folder.
///
/// Existing documents are left untouched. Returns the paths that were created.
pub fn init(storage: &Storage, config: &Config) -> Result<Vec<PathBuf>> {
    storage.create_dir(&config.download_dir)?;

    let mut created = Vec::new();
    for (path, layout) in [
        (&config.readme, Layout::HEARTBEAT),
        (&config.download_log, Layout::DOWNLOADS),
    ] {
        if storage.exists(path) {
            continue;
        }
        storage.save_document(path, &document::skeleton(&layout))?;
        info!(path = %path.display(), "created log document");
        created.push(path.clone());
    }
    Ok(created)
}

/// The document at `path`, or the layout's skeleton if it is missing or blank.
fn load_or_skeleton(storage: &Storage, path: &Path, layout: &Layout) -> Result<String> {
    Ok(storage
        .load_document(path)?
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| document::skeleton(layout)))
}

/// Payload lines of a batch entry: counts, total size, one line per stored file.
fn batch_lines(summary: &FetchSummary, results: &[FetchResult]) -> Vec<String> {
    let mut lines = vec![
        format!("- **Attempted:** {}", summary.attempted),
        format!("- **Downloaded:** {}", summary.succeeded),
        format!("- **Failed:** {}", summary.failed),
        format!("- **Total Size:** {}", format_size(summary.total_bytes)),
    ];
    if summary.succeeded > 0 {
        lines.push("- **Files:**".to_string());
    }
    for result in results {
        match &result.outcome {
            FetchOutcome::Saved { name, bytes } => {
                lines.push(format!("  - 📄 {name} ({})", format_size(*bytes)));
            }
            FetchOutcome::Unchanged { name, bytes } => {
                lines.push(format!("  - 📄 {name} ({}, unchanged)", format_size(*bytes)));
            }
            FetchOutcome::Failed { .. } => {}
        }
    }
    lines
}
