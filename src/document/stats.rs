//! Stats section: the counter, the last-updated time and the status line.

use std::sync::LazyLock;

use jiff::Zoned;
use regex::Regex;

use super::{append_block, find_section, insert_after_line, splice};
use crate::model::{Layout, Markers};

const STATUS: &str = "🟢 Active";

static LAST_UPDATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\*\*Last Updated:\*\*[ \t]*(.*?)[ \t\r]*$")
        .expect("valid last-updated pattern")
});

/// A rewritten document along with the counter value it now holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsUpdate {
    pub document: String,
    pub total: u64,
}

/// Add `units` to the document's counter and re-render its stats section.
///
/// A missing or unparsable counter counts as zero. A missing section is
/// spliced in under the layout's title, or appended if the title is missing
/// too.
pub fn update(document: &str, layout: &Layout, now: &Zoned, units: u64) -> StatsUpdate {
    let found = find_section(document, Markers::STATS);
    let current = found
        .as_ref()
        .and_then(|s| parse_counter(&document[s.body.clone()], layout.counter_label))
        .unwrap_or(0);
    let total = current.saturating_add(units);

    let section = render(layout.counter_label, total, &last_updated(now));
    let document = match found {
        Some(s) => splice(document, s.span, &section),
        None => {
            let block = format!("{}\n{section}", layout.stats_heading);
            insert_after_line(document, layout.title, &block)
                .unwrap_or_else(|| append_block(document, &block))
        }
    };

    StatsUpdate { document, total }
}

/// The counter currently stored in the document, or zero.
pub fn read_counter(document: &str, layout: &Layout) -> u64 {
    find_section(document, Markers::STATS)
        .and_then(|s| parse_counter(&document[s.body], layout.counter_label))
        .unwrap_or(0)
}

/// The "last updated" text currently stored in the document.
pub fn read_last_updated(document: &str) -> Option<String> {
    let section = find_section(document, Markers::STATS)?;
    let captures = LAST_UPDATED.captures(&document[section.body])?;
    Some(captures.get(1)?.as_str().to_string())
}

/// Parse `**<label>:** <integer>` (bold optional) out of a section body.
///
/// A digit run too large for `u64` saturates, so the counter never drops.
fn parse_counter(body: &str, label: &str) -> Option<u64> {
    let pattern = Regex::new(&format!(
        r"(?:\*\*)?{}:(?:\*\*)?[ \t]*(\d+)",
        regex::escape(label)
    ))
    .ok()?;
    let digits = pattern.captures(body)?.get(1)?.as_str();
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Render the stats section, markers included.
///
/// Field lines end in two spaces: a markdown line break.
pub(super) fn render(label: &str, total: u64, last_updated: &str) -> String {
    format!(
        "{start}\n**{label}:** {total}  \n**Last Updated:** {last_updated}  \n**Status:** {STATUS}\n{end}",
        start = Markers::STATS.start,
        end = Markers::STATS.end,
    )
}

/// e.g. `March 14, 2025 at 09:26:53 AM`.
fn last_updated(now: &Zoned) -> String {
    format!(
        "{} at {}",
        now.strftime("%B %d, %Y"),
        now.strftime("%I:%M:%S %p")
    )
}
