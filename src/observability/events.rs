//! Observable events
//!
//! Events are explicit and typed; the logger takes an `Event`, never a
//! free-form string, so the set of things that can appear in logs is
//! closed and greppable.

use std::fmt;

/// Observable events in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A site was registered.
    SiteRegistered,
    /// A value or fill was stored into a draft.
    FactStored,
    /// A draft became visible.
    Published,
    /// A rollback reconstructed and published a snapshot.
    RolledBack,
    /// The journal was replayed on open.
    JournalReplayed,
    /// A torn tail was truncated on open.
    JournalTruncated,
}

impl Event {
    /// Stable identifier used as the `event` log field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SiteRegistered => "site_registered",
            Event::FactStored => "fact_stored",
            Event::Published => "published",
            Event::RolledBack => "rolled_back",
            Event::JournalReplayed => "journal_replayed",
            Event::JournalTruncated => "journal_truncated",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
