//! runlog configuration.
//!
//! Every key is optional; a missing file means defaults. The file is found
//! through a chain, first hit wins:
//!
//! 1. `--config <path>`: explicit per-invocation override
//! 2. `RUNLOG_CONFIG` env var: set once in the scheduler's environment
//! 3. `./runlog.toml`: next to the logs it describes
//! 4. `<config dir>/runlog/config.toml`: per-user default
//!
//! An explicitly named file (1 or 2) must exist. Discovered files (3 or 4)
//! are skipped when absent.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RUNLOG_CONFIG";

const LOCAL_FILE: &str = "runlog.toml";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// runlog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Document updated by the heartbeat job.
    pub readme: PathBuf,

    /// Folder downloaded files are written to.
    pub download_dir: PathBuf,

    /// Document updated by the fetch job.
    pub download_log: PathBuf,

    /// URLs fetched by the fetch job, in order.
    pub urls: Vec<String>,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Maximum number of history entries kept in each document.
    pub history_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            readme: PathBuf::from("README.md"),
            download_dir: PathBuf::from("pdfs"),
            download_log: PathBuf::from("pdfs").join("DOWNLOAD_LOG.md"),
            urls: Vec::new(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            history_cap: 10,
        }
    }
}

impl Config {
    /// Resolve and load the configuration through the lookup chain.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, String> {
        let env_path = env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let required = explicit.map(Path::to_path_buf).or(env_path);
        if let Some(path) = required {
            return Self::load(&path);
        }

        let discovered = [Some(PathBuf::from(LOCAL_FILE)), Self::user_path()];
        for path in discovered.into_iter().flatten() {
            if let Some(config) = Self::load_if_exists(&path)? {
                return Ok(config);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load config from `path`. Returns an error if the file is missing or invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        Self::load_if_exists(path)?.ok_or_else(|| format!("no config file found at {}", path.display()))
    }

    /// Load config from `path`, or `None` if there is no file there.
    fn load_if_exists(path: &Path) -> Result<Option<Self>, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config = Self::parse(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Parse a TOML document into a config, filling defaults.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// The per-user config path: `<config dir>/runlog/config.toml`.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("runlog").join("config.toml"))
    }

    /// History cap, never below one.
    pub fn history_cap(&self) -> usize {
        self.history_cap.max(1)
    }

    /// Per-request timeout, never below one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn parses_kebab_case_keys() {
        let config = Config::parse(
            r#"
            readme = "docs/LOG.md"
            download-dir = "papers"
            download-log = "papers/LOG.md"
            urls = ["https://example.com/a.pdf", "https://example.com/b.pdf"]
            timeout-secs = 5
            history-cap = 9
            "#,
        )
        .unwrap();

        assert_eq!(config.readme, PathBuf::from("docs/LOG.md"));
        assert_eq!(config.download_dir, PathBuf::from("papers"));
        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.history_cap(), 9);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("history_cap = 3").is_err());
    }

    #[test]
    fn history_cap_is_at_least_one() {
        let config = Config::parse("history-cap = 0").unwrap();
        assert_eq!(config.history_cap(), 1);
    }

    #[test]
    fn timeout_is_at_least_one_second() {
        let config = Config::parse("timeout-secs = 0").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn explicit_path_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "history-cap = 3").unwrap();

        let config = Config::resolve(Some(&path)).unwrap();

        assert_eq!(config.history_cap, 3);
    }

    #[test]
    fn missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();

        let err = Config::resolve(Some(&dir.path().join("nope.toml"))).unwrap_err();

        assert!(err.contains("no config file found"));
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "urls = 7").unwrap();

        let err = Config::load(&path).unwrap_err();

        assert!(err.contains("invalid config"));
        assert!(err.contains("bad.toml"));
    }
}
