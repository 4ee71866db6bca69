//! VersionLedger - The site registry and its publish transition
//!
//! The ledger owns every site's counter pair and is the only place they
//! are read or advanced. Registration is explicit: an operation against
//! an unregistered site is an error, never a silent creation, and a
//! second registration is an error rather than a reset (a reset would
//! orphan the site's entire history).

use std::collections::HashMap;

use super::{SiteId, SiteVersions, VersionId};
use crate::error::{StoreError, StoreResult};

/// Registry of per-site version counters.
#[derive(Debug, Default)]
pub struct VersionLedger {
    sites: HashMap<SiteId, SiteVersions>,
}

impl VersionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            sites: HashMap::new(),
        }
    }

    /// Registers a new site with `published = 0`, `pending = 1`.
    ///
    /// # Errors
    ///
    /// `SiteAlreadyExists` if the site was registered before. Double
    /// registration is a caller error, not an idempotent no-op.
    pub fn register(&mut self, site: SiteId) -> StoreResult<()> {
        if self.sites.contains_key(&site) {
            return Err(StoreError::SiteAlreadyExists(site));
        }
        self.sites.insert(site, SiteVersions::new());
        Ok(())
    }

    /// Returns the last published version of the site.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn current_published(&self, site: SiteId) -> StoreResult<VersionId> {
        self.versions(site).map(|v| v.published())
    }

    /// Returns the draft version currently accepting writes.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn current_draft(&self, site: SiteId) -> StoreResult<VersionId> {
        self.versions(site).map(|v| v.pending())
    }

    /// Publishes the site's draft and opens the next one.
    ///
    /// Returns the version that became visible.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn publish(&mut self, site: SiteId) -> StoreResult<VersionId> {
        match self.sites.get_mut(&site) {
            Some(v) => Ok(v.publish()),
            None => Err(StoreError::UnknownSite(site)),
        }
    }

    /// Returns true if the site is registered.
    pub fn is_registered(&self, site: SiteId) -> bool {
        self.sites.contains_key(&site)
    }

    fn versions(&self, site: SiteId) -> StoreResult<&SiteVersions> {
        self.sites.get(&site).ok_or(StoreError::UnknownSite(site))
    }
}
