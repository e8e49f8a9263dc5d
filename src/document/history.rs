//! History section: bounded, newest-first run entries.
//!
//! Each entry is a block starting with a `### ` heading that carries a
//! `YYYY-MM-DD HH:MM:SS` timestamp and running until the next heading or the
//! end of the section. Anything else inside the section is dropped the next
//! time the section is rewritten.

use std::sync::LazyLock;

use regex::Regex;

use super::{append_block, find_section, splice};
use crate::model::{HistoryEntry, Layout, Markers};

const HEADING_PREFIX: &str = "### ";

const EMOJI: [&str; 10] = ["🚀", "⭐", "🎯", "💫", "🔥", "✨", "🎉", "🌟", "💪", "🎊"];

static ENTRY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^### .+ - \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").expect("valid entry heading pattern")
});

static ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#(\d+) - \d{4}-\d{2}-\d{2} ").expect("valid ordinal pattern")
});

/// Insert `entry` at the front of the history, keeping at most `cap` entries.
///
/// The oldest entries beyond the cap are discarded. A missing history
/// section is appended at the end of the document under the layout's
/// history heading. A cap of zero is treated as one: the new entry is
/// always kept.
pub fn append_entry(document: &str, layout: &Layout, entry: &HistoryEntry, cap: usize) -> String {
    let rendered = render_entry(entry);

    match find_section(document, Markers::HISTORY) {
        Some(section) => {
            let kept = parse_entries(&document[section.body.clone()]);
            splice(document, section.span, &render_section(&rendered, &kept, cap))
        }
        None => {
            let block = format!(
                "{}\n{}",
                layout.history_heading,
                render_section(&rendered, &[], cap)
            );
            append_block(document, &block)
        }
    }
}

/// Render one entry as a markdown block, without trailing newline.
pub fn render_entry(entry: &HistoryEntry) -> String {
    let emoji = EMOJI[usize::try_from(entry.ordinal % 10).unwrap_or_default()];

    let mut out = format!(
        "### {emoji} {} #{} - {}\n\
         - **Date:** {}\n\
         - **Time:** {}\n\
         - **Status:** {}",
        entry.title,
        entry.ordinal,
        entry.at.strftime("%Y-%m-%d %H:%M:%S"),
        entry.at.strftime("%B %d, %Y"),
        entry.at.strftime("%I:%M:%S %p %Z"),
        entry.status.label(),
    );
    for line in &entry.lines {
        out.push('\n');
        out.push_str(line);
    }
    out
}

/// Number of well-formed entries currently in the history.
pub fn count_entries(document: &str) -> usize {
    find_section(document, Markers::HISTORY)
        .map_or(0, |s| parse_entries(&document[s.body]).len())
}

/// Ordinal of the newest entry, if there is one.
pub fn latest_ordinal(document: &str) -> Option<u64> {
    let section = find_section(document, Markers::HISTORY)?;
    let entries = parse_entries(&document[section.body]);
    let heading = entries.first()?.lines().next()?;
    ORDINAL.captures(heading)?.get(1)?.as_str().parse().ok()
}

/// Split a section body into entry blocks, newest first as stored.
///
/// Blocks are trimmed. Text before the first heading and blocks whose
/// heading has no timestamp are dropped.
fn parse_entries(body: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_start().starts_with(HEADING_PREFIX) {
            starts.push(offset);
        }
        offset += line.len();
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(body.len());
            body[start..end].trim()
        })
        .filter(|block| {
            block
                .lines()
                .next()
                .is_some_and(|heading| ENTRY_HEADING.is_match(heading))
        })
        .collect()
}

/// Render the section: markers, the new entry, then up to `cap - 1` kept
/// entries, each separated by one blank line.
fn render_section(new_entry: &str, kept: &[&str], cap: usize) -> String {
    let mut out = String::from(Markers::HISTORY.start);
    out.push('\n');
    out.push_str(new_entry.trim());
    for entry in kept.iter().take(cap.max(1) - 1) {
        out.push_str("\n\n");
        out.push_str(entry);
    }
    out.push('\n');
    out.push_str(Markers::HISTORY.end);
    out
}
