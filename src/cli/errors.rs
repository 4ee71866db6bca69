//! CLI error types

use thiserror::Error;

use crate::error::StoreError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
    /// The store rejected the operation.
    #[error("{0}")]
    Store(#[from] StoreError),
}
