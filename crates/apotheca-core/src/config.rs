// ── Runtime store configuration ──
//
// Describes where the remote store lives and where the local mirror is
// kept. Never touches disk; the CLI builds a `StoreConfig` from its
// profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use apotheca_api::DEFAULT_TIMEOUT;

pub const DEFAULT_API_URL: &str = "http://localhost:8082/api/medicines";

/// Configuration for a single inventory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the medicines resource (e.g. `http://localhost:8082/api/medicines`).
    pub api_url: Url,
    /// Per-request deadline against the remote store.
    pub timeout: Duration,
    /// Directory holding the local mirror snapshots.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(api_url: Url, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
