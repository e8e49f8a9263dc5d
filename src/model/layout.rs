//! Document layouts: the fixed headings, labels and marker pairs of each log.

/// A pair of distinct literal tokens delimiting a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub start: &'static str,
    pub end: &'static str,
}

impl Markers {
    /// Delimits the run statistics (counter, last updated, status).
    pub const STATS: Self = Self {
        start: "<!-- STATS_START -->",
        end: "<!-- STATS_END -->",
    };

    /// Delimits the bounded run history.
    pub const HISTORY: Self = Self {
        start: "<!-- HISTORY_START -->",
        end: "<!-- HISTORY_END -->",
    };
}

/// Static description of one kind of log document.
///
/// The title doubles as the anchor heading: a missing stats section is
/// spliced in right after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub title: &'static str,
    pub intro: &'static str,
    pub stats_heading: &'static str,
    pub history_heading: &'static str,
    /// Label of the counter field, e.g. `Total Runs`.
    pub counter_label: &'static str,
    /// Word used in entry headings, e.g. `Run` in `### 🚀 Run #3 - ...`.
    pub entry_title: &'static str,
    pub footer: &'static str,
}

impl Layout {
    /// The README updated by the heartbeat job.
    pub const HEARTBEAT: Self = Self {
        title: "# 🤖 Automated Cron Job Test",
        intro: "Welcome to my automated cron job repository! \
                This README is updated automatically every 5 minutes.",
        stats_heading: "## 📊 Run Statistics",
        history_heading: "## 📝 Recent Run History",
        counter_label: "Total Runs",
        entry_title: "Run",
        footer: "*This file is automatically updated by GitHub Actions* ⚡",
    };

    /// The log appended to by the fetch job.
    pub const DOWNLOADS: Self = Self {
        title: "# 📚 PDF Download Log",
        intro: "Files in this folder are fetched automatically from a fixed list of sources.",
        stats_heading: "## 📊 Download Statistics",
        history_heading: "## 📝 Recent Downloads",
        counter_label: "Total Downloads",
        entry_title: "Batch",
        footer: "*This file is automatically updated by the download job* ⚡",
    };
}
