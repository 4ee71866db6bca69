//! SiteVersions - The two version counters of one site
//!
//! Invariants:
//! - `pending > published` at all times
//! - Both counters are monotonically non-decreasing
//! - `pending` is strictly greater than every version ever published
//!
//! Publishing is the ONLY mutator of either counter. There is no direct
//! setter; a counter can never move backwards.

use super::VersionId;

/// The published/pending version pair of a single site.
///
/// `published` is the last version visible to readers ("trunk");
/// `pending` is the version currently accepting writes ("branch").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteVersions {
    published: VersionId,
    pending: VersionId,
}

impl SiteVersions {
    /// Creates the counters of a freshly registered site:
    /// nothing published, version 1 accepting writes.
    pub fn new() -> Self {
        Self {
            published: VersionId::ZERO,
            pending: VersionId::ZERO.next(),
        }
    }

    /// The last published version. `VersionId::ZERO` if never published.
    #[inline]
    pub fn published(&self) -> VersionId {
        self.published
    }

    /// The draft version currently accepting writes.
    #[inline]
    pub fn pending(&self) -> VersionId {
        self.pending
    }

    /// Atomically makes the draft visible and opens the next draft.
    ///
    /// Sets `published := pending`, then `pending := pending + 1`.
    /// Publishing an empty draft is legal; it produces a snapshot with
    /// no facts of its own, which readers treat like any other version.
    ///
    /// Returns the version that became visible.
    pub fn publish(&mut self) -> VersionId {
        self.published = self.pending;
        self.pending = self.pending.next();
        self.published
    }
}

impl Default for SiteVersions {
    fn default() -> Self {
        Self::new()
    }
}
