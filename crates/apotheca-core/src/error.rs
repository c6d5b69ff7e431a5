// ── Core error types ──
//
// User-facing errors from apotheca-core. Consumers never see reqwest
// errors or raw JSON failures; the `From<apotheca_api::Error>` impl
// translates transport-layer errors into domain variants.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote store ─────────────────────────────────────────────────
    #[error("Cannot reach medicine store at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Medicine store timed out after {}ms", timeout.as_millis())]
    Timeout { timeout: Duration },

    /// Non-success status. Displays as "Failed to {action}: {status text}".
    #[error("Failed to {action}: {status_text}")]
    RemoteRequestFailed {
        action: String,
        status: u16,
        status_text: String,
    },

    #[error("Malformed response from medicine store: {message}")]
    Parse { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Local mirror ─────────────────────────────────────────────────
    #[error("Local mirror error ({key}): {message}")]
    Mirror { key: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the failure came from the remote store rather than local data.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::Timeout { .. }
                | Self::RemoteRequestFailed { .. }
                | Self::Parse { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<apotheca_api::Error> for CoreError {
    fn from(err: apotheca_api::Error) -> Self {
        match err {
            apotheca_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout {
                        timeout: Duration::ZERO,
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                }
            }
            apotheca_api::Error::Timeout { timeout } => CoreError::Timeout { timeout },
            apotheca_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            apotheca_api::Error::UnsupportedBaseUrl(url) => CoreError::Config {
                message: format!("Base URL cannot carry REST paths: {url}"),
            },
            apotheca_api::Error::ClientBuild(message) => CoreError::Config { message },
            apotheca_api::Error::RemoteRequestFailed {
                action,
                status,
                status_text,
            } => CoreError::RemoteRequestFailed {
                action: action.to_owned(),
                status,
                status_text,
            },
            apotheca_api::Error::Deserialization { message, body: _ } => {
                CoreError::Parse { message }
            }
        }
    }
}
