//! trunkdb - A versioned site-option store
//!
//! Boolean settings keyed by `(brand, product, option)` per site, with
//! draft/publish versioning, five-level wildcard fill resolution, and
//! rollback that stages a historical snapshot as a new forward version
//! instead of rewriting history.

pub mod changelog;
pub mod cli;
pub mod engine;
pub mod error;
pub mod fact;
pub mod journal;
pub mod ledger;
pub mod observability;
pub mod resolver;
pub mod rollback;

pub use engine::OptionStore;
pub use error::{StoreError, StoreResult};
pub use ledger::{SiteId, VersionId};
