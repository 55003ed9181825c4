//! Error types for a sync run.
//!
//! Everything here is fatal: it stops the run before any change is made to
//! the monitoring service. Per-monitor API failures are not errors of the run;
//! they are recorded as outcomes in the [`SyncReport`](crate::SyncReport).

use std::path::PathBuf;

use monsync_adapters::AdapterError;
use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

/// A failure that aborts the whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("threshold table not found: {path}")]
    MissingInput { path: PathBuf },

    #[error("failed to read threshold table {path}: {details}")]
    ReadInput { path: PathBuf, details: String },

    #[error("threshold table is missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("monitor name `{name}` is produced by groups with different definitions")]
    NameCollision { name: String },

    #[error("invalid configuration: {details}")]
    Config { details: String },

    #[error("failed to list live monitors: {source}")]
    Listing {
        #[source]
        source: AdapterError,
    },
}

impl SyncError {
    /// Whether the failure came from the threshold table itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. }
                | Self::ReadInput { .. }
                | Self::MissingColumn { .. }
                | Self::MalformedRow { .. }
                | Self::NameCollision { .. }
        )
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(value: config::ConfigError) -> Self {
        Self::Config {
            details: value.to_string(),
        }
    }
}
