//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use apotheca_config::ConfigError;
use apotheca_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REMOTE: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Remote store ─────────────────────────────────────────────────
    #[error("Could not reach the medicine service at {url}")]
    #[diagnostic(
        code(apotheca::connection_failed),
        help(
            "Check that the service is running and the URL is right.\n\
             Cause: {reason}\n\
             List commands keep working from the local mirror; queries need the service."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Medicine service timed out after {millis}ms")]
    #[diagnostic(
        code(apotheca::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout { millis: u128 },

    #[error("Failed to {action}: {status_text} ({status})")]
    #[diagnostic(code(apotheca::remote_request))]
    RemoteRequestFailed {
        action: String,
        status: u16,
        status_text: String,
    },

    #[error("Unexpected response from the medicine service: {message}")]
    #[diagnostic(code(apotheca::parse))]
    Parse { message: String },

    // ── Records ──────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(apotheca::not_found),
        help("Run: apotheca {list_command} to see available ids")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(apotheca::validation))]
    Validation { field: String, reason: String },

    // ── Local mirror ─────────────────────────────────────────────────
    #[error("Local mirror error ({key}): {message}")]
    #[diagnostic(
        code(apotheca::mirror),
        help("Inspect it with: apotheca mirror show\nReset it with: apotheca mirror clear")
    )]
    Mirror { key: String, message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(apotheca::profile_not_found),
        help("Create one with: apotheca config init")
    )]
    ProfileNotFound { name: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(apotheca::config),
        help("Check the file printed by: apotheca config path")
    )]
    Config { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(apotheca::render))]
    Render { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(apotheca::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::RemoteRequestFailed { .. } | Self::Parse { .. } => exit_code::REMOTE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout } => CliError::Timeout {
                millis: timeout.as_millis(),
            },

            CoreError::RemoteRequestFailed {
                action,
                status,
                status_text,
            } => CliError::RemoteRequestFailed {
                action,
                status,
                status_text,
            },

            CoreError::Parse { message } => CliError::Parse { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{}s list", entity_type.to_lowercase()),
                resource_type: entity_type.into(),
                identifier,
            },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::Mirror { key, message } => CliError::Mirror { key, message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound { name },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let timeout = CliError::from(CoreError::Timeout {
            timeout: Duration::from_millis(1500),
        });
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);
        assert_eq!(timeout.to_string(), "Medicine service timed out after 1500ms");

        let missing = CliError::from(CoreError::NotFound {
            entity_type: "Medicine",
            identifier: "42".into(),
        });
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
        assert!(
            matches!(missing, CliError::NotFound { ref list_command, .. } if list_command == "medicines list")
        );

        let offline = CliError::from(CoreError::ConnectionFailed {
            url: "http://127.0.0.1:1/api/medicines".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(offline.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn unknown_profile_is_a_usage_error() {
        let err = CliError::from(ConfigError::UnknownProfile {
            name: "clinic".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(err.to_string(), "Profile 'clinic' not found in configuration");
    }
}
