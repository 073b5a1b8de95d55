//! # CLI Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Entry store or table failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// JSON output serialization failure
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}
