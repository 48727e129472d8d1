//! Error types used by the barbershop runtime.
//!
//! Rejections are **not** errors: "no capacity" and "shop closed" are ordinary
//! [`Admission`](crate::Admission) outcomes. This module only covers failures of
//! the runtime itself:
//!
//! - [`RuntimeError`]: configuration problems, misuse of the lifecycle, an aborted close.
//!
//! Like the rest of the crate's errors it provides `as_label` / `as_message`
//! helpers for logs and metrics.

use std::path::PathBuf;

use thiserror::Error;

/// # Errors produced by the barbershop runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A configuration value is out of range.
    #[error("invalid config: {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    ConfigRead {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`Config`](crate::Config).
    #[error("failed to parse config {path:?}: {source}")]
    ConfigParse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// `close()` was called on a shop that is already closing or closed.
    #[error("shop is already closing")]
    AlreadyClosing,

    /// The runtime shut down while the closing task was still draining.
    #[error("closing aborted by runtime shutdown")]
    ClosingAborted,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use barbershop::RuntimeError;
    ///
    /// let err = RuntimeError::AlreadyClosing;
    /// assert_eq!(err.as_label(), "runtime_already_closing");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidConfig { .. } => "runtime_invalid_config",
            RuntimeError::ConfigRead { .. } => "runtime_config_read",
            RuntimeError::ConfigParse { .. } => "runtime_config_parse",
            RuntimeError::AlreadyClosing => "runtime_already_closing",
            RuntimeError::ClosingAborted => "runtime_closing_aborted",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::InvalidConfig { field, reason } => {
                format!("invalid {field}: {reason}")
            }
            RuntimeError::ConfigRead { path, source } => {
                format!("cannot read {}: {source}", path.display())
            }
            RuntimeError::ConfigParse { path, source } => {
                format!("cannot parse {}: {source}", path.display())
            }
            RuntimeError::AlreadyClosing => "close requested twice".to_string(),
            RuntimeError::ClosingAborted => {
                "closing task cancelled before ShopClosed".to_string()
            }
        }
    }

    /// Indicates whether the error comes from configuration (fix input and retry).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            RuntimeError::InvalidConfig { .. }
                | RuntimeError::ConfigRead { .. }
                | RuntimeError::ConfigParse { .. }
        )
    }
}
