//! Error types for reconciliation operations

use thiserror::Error;

/// Reconciliation specific errors
#[derive(Debug, Error)]
pub enum InvestError {
    /// A required input snapshot is missing or not valid structured data
    #[error("Data source unavailable: {path}: {reason}")]
    DataSourceUnavailable {
        path: String,
        reason: String,
    },

    /// Writing an output file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Quote collaborator failure
    #[error("Quote error: {0}")]
    QuoteError(String),
}

impl InvestError {
    /// Shorthand for [`InvestError::DataSourceUnavailable`]
    pub fn unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataSourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, InvestError>;
