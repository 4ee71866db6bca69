//! Changelog collaborator interface
//!
//! Every mutation emits one structured `ChangeEvent`; what becomes of
//! it (free-text rendering, durable audit storage) is the sink's
//! business, not the core's. The core guarantees only that the event
//! carries enough structure to reconstruct what was written and why.
//!
//! Journal replay does not re-emit events: the audit trail is an
//! online projection of mutations, not a recovery artifact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::fact::WireKey;
use crate::ledger::{SiteId, VersionId};

/// What kind of mutation produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A site was registered.
    Register,
    /// A value (possibly a fill) was stored into the draft.
    Store,
    /// A tombstone was written to keep a stale specific value from
    /// shadowing a broader fill.
    TombstoneCascade,
    /// The draft became the published version.
    Publish,
    /// A historical snapshot was staged and published.
    Rollback { target: VersionId },
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Register => write!(f, "register"),
            ChangeKind::Store => write!(f, "store"),
            ChangeKind::TombstoneCascade => write!(f, "tombstone-cascade"),
            ChangeKind::Publish => write!(f, "publish"),
            ChangeKind::Rollback { target } => write!(f, "rollback to {}", target),
        }
    }
}

/// One structured audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub id: Uuid,
    pub site: SiteId,
    /// The version the mutation touched: the draft for writes, the
    /// newly visible version for publish and rollback.
    pub version: VersionId,
    pub kind: ChangeKind,
    /// The affected scope in sentinel form; absent for site-level
    /// mutations (register, publish, rollback).
    pub scope: Option<WireKey>,
    /// The stored setting; absent for tombstones and site-level events.
    pub value: Option<bool>,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    fn new(
        site: SiteId,
        version: VersionId,
        kind: ChangeKind,
        scope: Option<WireKey>,
        value: Option<bool>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            site,
            version,
            kind,
            scope,
            value,
            at: Utc::now(),
        }
    }

    pub fn register(site: SiteId) -> Self {
        Self::new(site, VersionId::ZERO, ChangeKind::Register, None, None)
    }

    pub fn store(site: SiteId, version: VersionId, scope: WireKey, value: bool) -> Self {
        Self::new(site, version, ChangeKind::Store, Some(scope), Some(value))
    }

    pub fn tombstone(site: SiteId, version: VersionId, scope: WireKey) -> Self {
        Self::new(site, version, ChangeKind::TombstoneCascade, Some(scope), None)
    }

    pub fn publish(site: SiteId, version: VersionId) -> Self {
        Self::new(site, version, ChangeKind::Publish, None, None)
    }

    pub fn rollback(site: SiteId, version: VersionId, target: VersionId) -> Self {
        Self::new(site, version, ChangeKind::Rollback { target }, None, None)
    }

    /// Renders one human-readable line. Convenience for sinks that
    /// want the obvious formatting.
    pub fn describe(&self) -> String {
        match (&self.scope, self.value) {
            (Some(scope), Some(value)) => format!(
                "site {} {}: ({}, {}, {}) = {}",
                self.site, self.version, scope.brand, scope.product, scope.option, value
            ),
            (Some(scope), None) => format!(
                "site {} {}: {} at ({}, {}, {})",
                self.site, self.version, self.kind, scope.brand, scope.product, scope.option
            ),
            _ => format!("site {} {}: {}", self.site, self.version, self.kind),
        }
    }
}

/// Receiver of change events.
pub trait ChangeSink {
    fn record(&mut self, event: ChangeEvent);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ChangeSink for NullSink {
    fn record(&mut self, _event: ChangeEvent) {}
}

/// In-memory changelog. Clones share the same backing store, so a
/// caller can hand one clone to the engine and keep another to read
/// the entries back.
#[derive(Debug, Default, Clone)]
pub struct MemoryChangelog {
    entries: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl MemoryChangelog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries, in order.
    pub fn entries(&self) -> Vec<ChangeEvent> {
        self.entries.lock().expect("changelog poisoned").clone()
    }

    /// All entries rendered as human-readable lines.
    pub fn describe_all(&self) -> Vec<String> {
        self.entries().iter().map(ChangeEvent::describe).collect()
    }
}

impl ChangeSink for MemoryChangelog {
    fn record(&mut self, event: ChangeEvent) {
        self.entries.lock().expect("changelog poisoned").push(event);
    }
}
