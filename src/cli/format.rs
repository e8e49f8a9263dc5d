//! Output formatting for CLI display.

use crate::job::Snapshot;
use crate::model::{FetchOutcome, FetchResult, FetchSummary, format_size};

/// One console line for a fetch result.
pub(super) fn format_result(result: &FetchResult) -> String {
    let Some(name) = result.name() else {
        let reason = match &result.outcome {
            FetchOutcome::Failed { reason } => reason.as_str(),
            _ => "unknown error",
        };
        return format!("❌ {}: {reason}", result.url);
    };

    let size = format_size(result.size());
    if matches!(result.outcome, FetchOutcome::Unchanged { .. }) {
        format!("♻️ {name} unchanged ({size})")
    } else {
        format!("✅ {name} ({size})")
    }
}

pub(super) fn format_summary(summary: &FetchSummary) -> String {
    format!(
        "{}/{} succeeded, {} total",
        summary.succeeded,
        summary.attempted,
        format_size(summary.total_bytes)
    )
}

pub(super) fn format_snapshot(snapshot: &Snapshot) -> String {
    let last_updated = snapshot.last_updated.as_deref().unwrap_or("unknown");
    let latest = snapshot
        .latest_entry
        .map(|n| format!(" (latest #{n})"))
        .unwrap_or_default();

    format!(
        "{}\n  {}: {}\n  Last Updated: {last_updated}\n  History: {} entries{latest}",
        snapshot.document.display(),
        snapshot.counter_label,
        snapshot.total,
        snapshot.entries,
    )
}
