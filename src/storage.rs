//! Local persistence for log documents and downloaded files.
//!
//! Everything lives under one root directory (the working directory of the
//! job). Relative paths from the configuration are resolved against it:
//!
//! ```text
//! <root>/
//!   README.md                # Heartbeat log
//!   pdfs/                    # Download folder
//!     DOWNLOAD_LOG.md        # Fetch log
//!     <name>.pdf
//! ```
//!
//! Writes go to a sibling temp file first and are renamed over the target,
//! so a document is replaced whole or not at all.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} is not valid UTF-8", .path.display())]
    NotText { path: PathBuf },
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based storage rooted at a working directory.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a storage instance rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a configured path against the root. Absolute paths pass through.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    // ── Documents ──

    /// Loads a text document. Returns `None` if it doesn't exist.
    pub fn load_document(&self, path: &Path) -> Result<Option<String>> {
        let Some(bytes) = self.load_bytes(path)? else {
            return Ok(None);
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| StorageError::NotText {
                path: self.resolve(path),
            })
    }

    /// Replaces a text document in one write.
    pub fn save_document(&self, path: &Path, contents: &str) -> Result<()> {
        self.write_file(path, contents.as_bytes())
    }

    // ── Files ──

    /// Loads a file's bytes. Returns `None` if it doesn't exist.
    pub fn load_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let path = self.resolve(path);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    /// Writes a file atomically, creating parent directories as needed.
    pub fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(path);
        let write_err = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = temp_path(&path);
        fs::write(&tmp, bytes).map_err(write_err)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }
        Ok(())
    }

    /// Creates a directory and its parents. Idempotent.
    pub fn create_dir(&self, path: &Path) -> Result<()> {
        let path = self.resolve(path);
        fs::create_dir_all(&path).map_err(|source| StorageError::Write { path, source })
    }

    /// Whether a file or directory exists at `path`.
    pub fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}

/// `<dir>/.<name>.tmp`, next to the target so the rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "runlog".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.tmp"))
}
