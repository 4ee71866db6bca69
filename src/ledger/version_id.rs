//! VersionId - Totally ordered per-site version identity
//!
//! Versions number the snapshots of a single site:
//! - `VersionId(0)` is the pre-publish state; nothing is visible at it
//! - Publishing assigns the next identity; identities are never reused
//! - The ordering is total and strict within a site
//!
//! Identities from different sites are not comparable in any meaningful
//! way; the type does not prevent it, the ledger API never mixes them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A totally ordered version identity within one site.
///
/// Wraps a u64. Version 0 is reserved for "nothing published yet":
/// no fact is ever written at version 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VersionId(u64);

impl VersionId {
    /// The pre-publish state of a fresh site.
    pub const ZERO: VersionId = VersionId(0);

    /// Creates a version identity from a raw value.
    pub const fn new(value: u64) -> Self {
        VersionId(value)
    }

    /// Returns the raw value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the next version identity.
    #[inline]
    pub fn next(&self) -> VersionId {
        VersionId(self.0 + 1)
    }

    /// Returns true if this is the pre-publish sentinel (version 0).
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
