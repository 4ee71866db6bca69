//! SiteId - Opaque site key

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an independently-versioned site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SiteId(u64);

impl SiteId {
    /// Creates a site identifier from a raw value.
    pub const fn new(value: u64) -> Self {
        SiteId(value)
    }

    /// Returns the raw value.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
