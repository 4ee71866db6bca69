//! Version Ledger - Per-site published/pending version counters
//!
//! Each site carries two counters: the published ("trunk") version that
//! readers see, and the pending ("branch") version that accepts writes.
//! The publish transition is the only mutator of either counter.
//!
//! This module provides:
//! - `SiteId` - Opaque site key
//! - `VersionId` - Totally ordered version identity within a site
//! - `SiteVersions` - One site's counter pair and its publish transition
//! - `VersionLedger` - The registry of all sites

mod ledger;
mod site_id;
mod site_versions;
mod version_id;

pub use ledger::VersionLedger;
pub use site_id::SiteId;
pub use site_versions::SiteVersions;
pub use version_id::VersionId;
