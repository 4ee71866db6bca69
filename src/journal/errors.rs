//! Journal error types

use std::io;
use thiserror::Error;

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

/// Errors from the durable operation journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Disk I/O failure.
    #[error("journal i/o failure ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A record payload could not be encoded or decoded.
    #[error("journal record encoding: {0}")]
    Encoding(#[from] serde_json::Error),

    /// A record body failed structural validation (unknown type tag,
    /// impossible length). Checksum failures at the tail are handled
    /// by truncation, not surfaced as errors.
    #[error("journal corruption at offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },
}

impl JournalError {
    /// Wraps an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
