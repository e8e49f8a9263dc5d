//! Fetching: download a fixed list of files into the download folder.
//!
//! Each URL is attempted exactly once. Network and content failures are
//! recorded per URL and never abort the batch; only a failure to write to
//! local storage stops the run.
//!
//! Before anything is written, the body is compared by SHA-256 against an
//! existing file of the same name. Identical content is left alone, so
//! repeated runs keep one copy per name. URLs that map to the same name in
//! one batch get numbered names (`paper.pdf`, `paper-2.pdf`) so no success
//! is ever overwritten by a later one.

mod http;

pub use http::HttpFetcher;

use std::collections::HashSet;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::model::{FetchOutcome, FetchResult};
use crate::storage::{Result, Storage};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A fetched response body and what the server said it was.
#[derive(Debug, Clone)]
pub struct Download {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Errors for a single fetch. Recorded, never propagated out of a batch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("unexpected content type: {}", .0.as_deref().unwrap_or("none"))]
    ContentType(Option<String>),
}

/// Something that can GET a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> core::result::Result<Download, FetchError>;
}

/// Fetch every URL into `dir`, returning one result per URL in order.
pub fn fetch_all(
    fetcher: &impl Fetch,
    urls: &[String],
    storage: &Storage,
    dir: &Path,
) -> Result<Vec<FetchResult>> {
    storage.create_dir(dir)?;

    let mut results = Vec::with_capacity(urls.len());
    let mut used = HashSet::new();
    for (index, url) in urls.iter().enumerate() {
        let outcome = match fetcher.fetch(url).and_then(check_content) {
            Ok(body) => {
                let name = unique_name(file_name_for(url, index), &used);
                used.insert(name.clone());
                store(storage, dir, name, &body)?
            }
            Err(e) => {
                warn!(url = %url, error = %e, "fetch failed");
                FetchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        results.push(FetchResult {
            url: url.clone(),
            outcome,
        });
    }
    Ok(results)
}

/// Accept the body only if it plausibly is a PDF.
fn check_content(download: Download) -> core::result::Result<Vec<u8>, FetchError> {
    let declared = download
        .content_type
        .as_deref()
        .map(str::to_ascii_lowercase)
        .is_some_and(|ct| ct.contains("pdf") || ct.contains("octet-stream"));

    if declared || download.body.starts_with(PDF_MAGIC) {
        Ok(download.body)
    } else {
        Err(FetchError::ContentType(download.content_type))
    }
}

/// Write `body` to `dir/name` unless an identical file is already there.
fn store(storage: &Storage, dir: &Path, name: String, body: &[u8]) -> Result<FetchOutcome> {
    let path = dir.join(&name);
    let bytes = body.len() as u64;
    let digest = sha256_hex(body);

    if let Some(existing) = storage.load_bytes(&path)?
        && sha256_hex(&existing) == digest
    {
        debug!(path = %path.display(), %digest, "content unchanged, skipping write");
        return Ok(FetchOutcome::Unchanged { name, bytes });
    }

    storage.write_file(&path, body)?;
    info!(path = %path.display(), bytes, %digest, "saved download");
    Ok(FetchOutcome::Saved { name, bytes })
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// `name`, or `stem-<n>.ext` with the smallest `n >= 2` not already in `used`.
fn unique_name(name: String, used: &HashSet<String>) -> String {
    if !used.contains(&name) {
        return name;
    }
    let (stem, ext) = name.rsplit_once('.').unwrap_or((name.as_str(), "pdf"));
    (2..)
        .map(|n| format!("{stem}-{n}.{ext}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| name.clone())
}

/// Local file name for a URL: its last path segment, restricted to a safe
/// character set, with a `.pdf` extension.
///
/// Falls back to `document-<n>.pdf` (1-based) when the URL has no usable segment.
pub fn file_name_for(url: &str, index: usize) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| {
            rest.split_once('/').map_or("", |(_, path)| path)
        });
    let segment = path.rsplit('/').next().unwrap_or_default();

    let mut name: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.chars().all(|c| matches!(c, '.' | '_')) {
        return format!("document-{}.pdf", index + 1);
    }
    if !name.to_ascii_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    use super::stub::StubFetcher;
    use crate::model::FetchSummary;

    fn pdf(len: usize) -> Vec<u8> {
        let mut body = PDF_MAGIC.to_vec();
        body.resize(len, b'x');
        body
    }

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        (dir, storage)
    }

    #[test]
    fn batch_records_each_url_and_continues_past_failures() {
        let (dir, storage) = test_storage();
        let fetcher = StubFetcher::default()
            .with("https://example.com/a.pdf", Some("application/pdf"), &pdf(100))
            .with("https://example.com/b.pdf", Some("application/pdf"), &pdf(50));
        let urls = vec![
            "https://example.com/a.pdf".to_string(),
            "https://example.com/missing.pdf".to_string(),
            "https://example.com/b.pdf".to_string(),
        ];

        let results = fetch_all(&fetcher, &urls, &storage, Path::new("pdfs")).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name(), Some("a.pdf"));
        assert!(!results[1].is_success());
        assert_eq!(results[2].name(), Some("b.pdf"));
        assert_eq!(*fetcher.requested.borrow(), urls);

        let summary = FetchSummary::from_results(&results);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.total_bytes, 150);

        assert_eq!(fs::read(dir.path().join("pdfs/a.pdf")).unwrap(), pdf(100));
        assert!(!dir.path().join("pdfs/missing.pdf").exists());
    }

    #[test]
    fn identical_content_is_not_rewritten() {
        let (dir, storage) = test_storage();
        let fetcher =
            StubFetcher::default().with("https://example.com/a.pdf", Some("application/pdf"), &pdf(10));
        let urls = vec!["https://example.com/a.pdf".to_string()];

        let first = fetch_all(&fetcher, &urls, &storage, Path::new("pdfs")).unwrap();
        let second = fetch_all(&fetcher, &urls, &storage, Path::new("pdfs")).unwrap();

        assert!(matches!(first[0].outcome, FetchOutcome::Saved { .. }));
        assert_eq!(
            second[0].outcome,
            FetchOutcome::Unchanged {
                name: "a.pdf".into(),
                bytes: 10
            }
        );
        assert_eq!(fs::read_dir(dir.path().join("pdfs")).unwrap().count(), 1);
    }

    #[test]
    fn changed_content_overwrites() {
        let (dir, storage) = test_storage();
        storage
            .write_file(Path::new("pdfs/a.pdf"), b"%PDF-old")
            .unwrap();
        let fetcher =
            StubFetcher::default().with("https://example.com/a.pdf", None, b"%PDF-new");

        let results = fetch_all(
            &fetcher,
            &["https://example.com/a.pdf".to_string()],
            &storage,
            Path::new("pdfs"),
        )
        .unwrap();

        assert!(matches!(results[0].outcome, FetchOutcome::Saved { .. }));
        assert_eq!(fs::read(dir.path().join("pdfs/a.pdf")).unwrap(), b"%PDF-new");
    }

    #[test]
    fn html_response_is_rejected() {
        let (dir, storage) = test_storage();
        let fetcher = StubFetcher::default().with(
            "https://example.com/paper.pdf",
            Some("text/html; charset=utf-8"),
            b"<html>login required</html>",
        );

        let results = fetch_all(
            &fetcher,
            &["https://example.com/paper.pdf".to_string()],
            &storage,
            Path::new("pdfs"),
        )
        .unwrap();

        assert!(matches!(
            &results[0].outcome,
            FetchOutcome::Failed { reason } if reason.contains("text/html")
        ));
        assert!(!dir.path().join("pdfs/paper.pdf").exists());
    }

    #[test]
    fn content_check_accepts_declared_or_sniffed_pdf() {
        let accept = [
            (Some("application/pdf"), b"anything".to_vec()),
            (Some("Application/PDF"), b"anything".to_vec()),
            (Some("application/octet-stream"), b"anything".to_vec()),
            (Some("text/plain"), pdf(8)),
            (None, pdf(8)),
        ];
        for (content_type, body) in accept {
            let download = Download {
                content_type: content_type.map(String::from),
                body,
            };
            assert!(check_content(download).is_ok(), "{content_type:?}");
        }

        let reject = Download {
            content_type: None,
            body: b"plain text".to_vec(),
        };
        assert!(matches!(
            check_content(reject),
            Err(FetchError::ContentType(None))
        ));
    }

    #[test]
    fn empty_url_list_creates_folder_only() {
        let (dir, storage) = test_storage();

        let results =
            fetch_all(&StubFetcher::default(), &[], &storage, Path::new("pdfs")).unwrap();

        assert!(results.is_empty());
        assert!(dir.path().join("pdfs").is_dir());
    }

    #[test]
    fn same_file_name_in_one_batch_is_numbered() {
        let (dir, storage) = test_storage();
        let fetcher = StubFetcher::default()
            .with("https://a.example/v1/paper.pdf", Some("application/pdf"), b"%PDF-first")
            .with("https://b.example/v2/paper.pdf", Some("application/pdf"), b"%PDF-second")
            .with("https://c.example/paper.pdf", Some("application/pdf"), b"%PDF-third");
        let urls = vec![
            "https://a.example/v1/paper.pdf".to_string(),
            "https://b.example/v2/paper.pdf".to_string(),
            "https://c.example/paper.pdf".to_string(),
        ];

        let results = fetch_all(&fetcher, &urls, &storage, Path::new("pdfs")).unwrap();

        let names: Vec<_> = results.iter().map(FetchResult::name).collect();
        assert_eq!(
            names,
            [Some("paper.pdf"), Some("paper-2.pdf"), Some("paper-3.pdf")]
        );
        assert!(results
            .iter()
            .all(|r| matches!(r.outcome, FetchOutcome::Saved { .. })));

        let pdfs = dir.path().join("pdfs");
        assert_eq!(fs::read_dir(&pdfs).unwrap().count(), 3);
        assert_eq!(fs::read(pdfs.join("paper.pdf")).unwrap(), b"%PDF-first");
        assert_eq!(fs::read(pdfs.join("paper-2.pdf")).unwrap(), b"%PDF-second");
        assert_eq!(fs::read(pdfs.join("paper-3.pdf")).unwrap(), b"%PDF-third");

        // Same order next run: every name maps to the same content again.
        let again = fetch_all(&fetcher, &urls, &storage, Path::new("pdfs")).unwrap();
        assert!(again
            .iter()
            .all(|r| matches!(r.outcome, FetchOutcome::Unchanged { .. })));
    }

    #[test]
    fn unique_name_skips_taken_numbers() {
        let used: HashSet<String> = ["a.pdf", "a-2.pdf"].map(String::from).into();

        assert_eq!(unique_name("b.pdf".into(), &used), "b.pdf");
        assert_eq!(unique_name("a.pdf".into(), &used), "a-3.pdf");
        assert_eq!(unique_name("a-2.pdf".into(), &used), "a-2-2.pdf");
    }

    #[test]
    fn file_names_from_urls() {
        let cases = [
            ("https://example.com/papers/attention.pdf", "attention.pdf"),
            ("https://example.com/a.PDF?download=1", "a.PDF"),
            ("https://example.com/report#page=2", "report.pdf"),
            ("https://example.com/my%20paper.pdf", "my_20paper.pdf"),
            ("https://example.com/files/", "document-4.pdf"),
            ("https://example.com", "document-4.pdf"),
            ("not a url", "not_a_url.pdf"),
        ];
        for (url, expected) in cases {
            assert_eq!(file_name_for(url, 3), expected, "{url}");
        }
    }
}
