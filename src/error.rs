//! Crate-level error taxonomy
//!
//! Every error is surfaced to the caller; nothing is retried
//! internally and nothing is silently created or reset. A failed
//! operation leaves state exactly as it was before the call.

use thiserror::Error;

use crate::journal::JournalError;
use crate::ledger::{SiteId, VersionId};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation referenced a site that was never registered.
    #[error("unknown site {0}")]
    UnknownSite(SiteId),

    /// The site was registered before. Re-registration would reset
    /// the version counters and orphan history, so it is an error.
    #[error("site {0} is already registered")]
    SiteAlreadyExists(SiteId),

    /// Rollback target is zero or beyond the published version.
    #[error("invalid rollback target {target} for site {site}: published is {published}")]
    InvalidTarget {
        site: SiteId,
        target: VersionId,
        published: VersionId,
    },

    /// The persistence collaborator failed.
    #[error("storage failure: {0}")]
    Storage(#[from] JournalError),
}
