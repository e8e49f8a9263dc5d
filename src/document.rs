//! Marker-delimited sections of a log document.
//!
//! A section is located by two literal tokens: the first start marker, then
//! the first end marker after it. Rewriting a section replaces the markers
//! along with the body, so the document is well-formed after every call.
//!
//! Nothing here fails on malformed input. Missing sections are synthesized,
//! unparsable fields fall back to defaults; a hand-edited log never blocks
//! the next run.

mod history;
mod stats;

use std::ops::Range;

use crate::model::{Layout, Markers};

pub use history::{append_entry, count_entries, latest_ordinal};
pub use stats::{read_counter, read_last_updated, update};

/// Byte ranges of a located section.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    /// The whole section, markers included.
    span: Range<usize>,
    /// The text between the markers.
    body: Range<usize>,
}

/// Locate the section delimited by `markers`.
///
/// A start marker with no end marker after it is treated as an empty section
/// spanning just the start marker, so rewriting it repairs the document
/// instead of appending a second copy.
fn find_section(document: &str, markers: Markers) -> Option<Section> {
    let start = document.find(markers.start)?;
    let body_start = start + markers.start.len();

    let Some(offset) = document[body_start..].find(markers.end) else {
        return Some(Section {
            span: start..body_start,
            body: body_start..body_start,
        });
    };

    let body_end = body_start + offset;
    Some(Section {
        span: start..body_end + markers.end.len(),
        body: body_start..body_end,
    })
}

/// Replace `span` of `document` with `replacement`.
fn splice(document: &str, span: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(document.len() - span.len() + replacement.len());
    out.push_str(&document[..span.start]);
    out.push_str(replacement);
    out.push_str(&document[span.end..]);
    out
}

/// Insert `block` after the first line equal to `anchor`, separated by a blank line.
///
/// Returns `None` if no such line exists.
fn insert_after_line(document: &str, anchor: &str, block: &str) -> Option<String> {
    let mut offset = 0;
    for line in document.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        if content.trim() == anchor {
            let at = offset + content.len();
            return Some(splice(document, at..at, &format!("\n\n{block}")));
        }
        offset += line.len();
    }
    None
}

/// Append `block` at the end of the document, separated by a blank line.
fn append_block(document: &str, block: &str) -> String {
    let head = document.trim_end();
    if head.is_empty() {
        format!("{block}\n")
    } else {
        format!("{head}\n\n{block}\n")
    }
}

/// Default contents for a document that doesn't exist yet.
///
/// Both sections are present and empty: the counter reads zero and the
/// history holds no entries.
pub fn skeleton(layout: &Layout) -> String {
    format!(
        "{title}\n\n{intro}\n\n{stats_heading}\n{stats}\n\n{history_heading}\n{start}\n{end}\n\n---\n{footer}\n",
        title = layout.title,
        intro = layout.intro,
        stats_heading = layout.stats_heading,
        stats = stats::render(layout.counter_label, 0, "Never"),
        history_heading = layout.history_heading,
        start = Markers::HISTORY.start,
        end = Markers::HISTORY.end,
        footer = layout.footer,
    )
}
