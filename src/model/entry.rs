//! History entries: one bounded record per run.

use jiff::Zoned;

/// One timestamped record of a past run, rendered as a text block.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Heading word, e.g. `Run` or `Batch`.
    pub title: String,
    pub ordinal: u64,
    pub at: Zoned,
    pub status: EntryStatus,
    /// Extra markdown lines rendered after the fixed date/time/status lines.
    pub lines: Vec<String>,
}

/// Outcome of the run an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Success,
    Partial,
    Failed,
}

impl EntryStatus {
    /// Classify a run from its unit counts.
    ///
    /// A run that attempted nothing is a failure: there is nothing to show for it.
    pub fn from_counts(succeeded: usize, attempted: usize) -> Self {
        if attempted == 0 || succeeded == 0 {
            Self::Failed
        } else if succeeded < attempted {
            Self::Partial
        } else {
            Self::Success
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "✅ Success",
            Self::Partial => "⚠️ Partial",
            Self::Failed => "❌ Failed",
        }
    }
}
