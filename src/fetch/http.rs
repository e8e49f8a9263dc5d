//! HTTP fetcher backed by a blocking `ureq` agent.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use super::{Download, Fetch, FetchError};

/// Largest body accepted from a single response.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// GETs URLs with a fixed timeout and a browser-like `User-Agent`.
///
/// Non-2xx statuses surface as errors from `ureq`.
pub struct HttpFetcher {
    agent: Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            user_agent: user_agent.into(),
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Download, FetchError> {
        debug!(url, "GET");
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()?;

        debug!(url, status = %response.status(), bytes = body.len(), "response received");
        Ok(Download { content_type, body })
    }
}
