//! OptionFact - One immutable versioned record
//!
//! A fact's value is tri-state: on, off, or an explicit tombstone.
//! The tombstone means "no value at this scope" and is distinct from
//! the absence of a fact; it exists so a broad fill can mask an older,
//! more specific value without deleting history. Tombstone is an
//! explicit variant, NOT represented via Option.

use crate::ledger::{SiteId, VersionId};

use super::OptionKey;

/// The value of an option fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactValue {
    /// A concrete on_site setting.
    Set(bool),
    /// An explicit "no value at this scope" marker.
    Tombstone,
}

impl FactValue {
    /// Returns true if this value is the tombstone.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, FactValue::Tombstone)
    }

    /// Returns the setting if this is a live value.
    #[inline]
    pub fn as_set(&self) -> Option<bool> {
        match self {
            FactValue::Set(b) => Some(*b),
            FactValue::Tombstone => None,
        }
    }
}

/// A single versioned record, immutable once its version is published.
///
/// At most one fact exists per exact `(site, version, key)`; within
/// the draft version a second write replaces the first, published
/// versions are never written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionFact {
    site: SiteId,
    version: VersionId,
    key: OptionKey,
    value: FactValue,
}

impl OptionFact {
    /// Creates a fact.
    pub fn new(site: SiteId, version: VersionId, key: OptionKey, value: FactValue) -> Self {
        Self {
            site,
            version,
            key,
            value,
        }
    }

    /// The site this fact belongs to.
    #[inline]
    pub fn site(&self) -> SiteId {
        self.site
    }

    /// The version the fact was written at.
    #[inline]
    pub fn version(&self) -> VersionId {
        self.version
    }

    /// The key, possibly a fill scope.
    #[inline]
    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    /// The tri-state value.
    #[inline]
    pub fn value(&self) -> FactValue {
        self.value
    }

    /// Returns true if this fact is a tombstone.
    #[inline]
    pub fn is_tombstone(&self) -> bool {
        self.value.is_tombstone()
    }
}
