//! Core data model for runlog.
//!
//! These types describe what a run produces and how it is laid out in the
//! persisted documents: layouts and their marker pairs, history entries,
//! and fetch results.

mod entry;
mod fetch;
mod layout;

pub use entry::{EntryStatus, HistoryEntry};
pub use fetch::{FetchOutcome, FetchResult, FetchSummary, format_size};
pub use layout::{Layout, Markers};
