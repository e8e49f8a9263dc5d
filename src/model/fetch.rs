//! Fetch results: what happened to each attempted URL.

/// The result of one attempted download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub url: String,
    pub outcome: FetchOutcome,
}

/// What a single fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The body was written to `name`.
    Saved { name: String, bytes: u64 },

    /// A file with the same name and identical content already existed.
    /// Nothing was written.
    Unchanged { name: String, bytes: u64 },

    /// The request, or the response sanity check, failed.
    Failed { reason: String },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, FetchOutcome::Failed { .. })
    }

    /// The stored file name, if the fetch succeeded.
    pub fn name(&self) -> Option<&str> {
        match &self.outcome {
            FetchOutcome::Saved { name, .. } | FetchOutcome::Unchanged { name, .. } => Some(name),
            FetchOutcome::Failed { .. } => None,
        }
    }

    /// Size of the fetched body in bytes; zero for failures.
    pub fn size(&self) -> u64 {
        match &self.outcome {
            FetchOutcome::Saved { bytes, .. } | FetchOutcome::Unchanged { bytes, .. } => *bytes,
            FetchOutcome::Failed { .. } => 0,
        }
    }
}

/// Aggregate over one batch of fetch results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_bytes: u64,
}

impl FetchSummary {
    pub fn from_results(results: &[FetchResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.attempted += 1;
            if result.is_success() {
                summary.succeeded += 1;
                summary.total_bytes += result.size();
            } else {
                summary.failed += 1;
            }
            summary
        })
    }
}

/// Human-readable byte size: `150 B`, `1.5 KiB`, `2.0 MiB`.
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    }
}
