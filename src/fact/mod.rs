//! Record Log - Versioned facts and their write path
//!
//! This module provides:
//! - `Scope` / `OptionKey` - Tagged wildcard fields and the three-part key
//! - `WireKey` - The sentinel form used at the persistence boundary
//! - `FactValue` / `OptionFact` - Tri-state versioned records
//! - `RecordLog` - The store itself, owning the tombstone-cascade write
//!   path and the `latest_at_or_before` read primitive

mod fact;
mod log;
mod scope;

pub use fact::{FactValue, OptionFact};
pub use log::RecordLog;
pub use scope::{OptionKey, Scope, WireKey, WILDCARD_OPTION, WILDCARD_TEXT};
