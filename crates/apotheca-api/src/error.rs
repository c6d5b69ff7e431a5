use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `apotheca-api` crate.
///
/// Covers every failure mode of the remote medicine store:
/// transport, timeouts, non-success statuses, and malformed bodies.
/// `apotheca-core` maps these into domain diagnostics and decides
/// whether to fall back to local data.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for REST paths: {0}")]
    UnsupportedBaseUrl(String),

    /// Request exceeded the transport deadline and was aborted.
    #[error("Request timed out after {}ms", timeout.as_millis())]
    Timeout { timeout: Duration },

    /// Failed to build the underlying HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Remote store ────────────────────────────────────────────────
    /// The store answered with a non-success HTTP status.
    #[error("Failed to {action}: {status_text}")]
    RemoteRequestFailed {
        action: &'static str,
        status: u16,
        status_text: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never got an answer in time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the store could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RemoteRequestFailed { status: 404, .. })
    }

    /// HTTP status of a failed request, if the store answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRequestFailed { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failure_display_carries_status_text() {
        let err = Error::RemoteRequestFailed {
            action: "fetch medicines",
            status: 503,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "Failed to fetch medicines: Service Unavailable");
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_not_found());
    }

    #[test]
    fn timeout_is_unreachable() {
        let err = Error::Timeout {
            timeout: Duration::from_secs(5),
        };
        assert!(err.is_timeout());
        assert!(err.is_unreachable());
        assert_eq!(err.to_string(), "Request timed out after 5000ms");
    }
}
