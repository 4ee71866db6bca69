//! OptionStore - The assembled engine
//!
//! Wires the version ledger, the record log, the resolver, and the
//! rollback engine over the operation journal and a changelog sink.
//!
//! Every mutation follows the same shape: validate, journal (append +
//! fsync), apply in memory. Validation precedes the append, so an
//! operation the core would reject is never journaled; the in-memory
//! apply of a validated operation cannot fail, so a record on disk and
//! the state it produced never diverge. A failed operation therefore
//! leaves both memory and disk exactly as they were.
//!
//! Mutating methods take `&mut self`: exclusive access for the full
//! logical operation is the borrow checker's problem, not a lock
//! discipline's. Reads take `&self` and only ever touch data at or
//! below the published version.

use std::path::Path;

use crate::changelog::{ChangeEvent, ChangeSink, NullSink};
use crate::error::{StoreError, StoreResult};
use crate::fact::{OptionKey, RecordLog};
use crate::journal::{
    journal_path, replay, JournalOp, JournalWriter, PublishPayload, RegisterPayload,
    RollbackPayload, StorePayload,
};
use crate::ledger::{SiteId, VersionId, VersionLedger};
use crate::observability::{Event, Logger};
use crate::resolver::{Resolved, Resolver};
use crate::rollback;

/// The versioned option store.
pub struct OptionStore {
    ledger: VersionLedger,
    log: RecordLog,
    journal: Option<JournalWriter>,
    sink: Box<dyn ChangeSink>,
}

impl OptionStore {
    /// A store with no durable journal. For tests and embedding.
    pub fn in_memory() -> Self {
        Self::in_memory_with_sink(Box::new(NullSink))
    }

    /// An in-memory store feeding the given changelog sink.
    pub fn in_memory_with_sink(sink: Box<dyn ChangeSink>) -> Self {
        Self {
            ledger: VersionLedger::new(),
            log: RecordLog::new(),
            journal: None,
            sink,
        }
    }

    /// Opens a durable store under `data_dir`, replaying the journal
    /// and truncating any torn tail.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        Self::open_with_sink(data_dir, Box::new(NullSink))
    }

    /// Opens a durable store feeding the given changelog sink.
    ///
    /// Replay does not feed the sink: the audit trail is an online
    /// projection, not a recovery artifact.
    pub fn open_with_sink(data_dir: &Path, sink: Box<dyn ChangeSink>) -> StoreResult<Self> {
        let replayed = replay(&journal_path(data_dir))?;

        let mut store = Self {
            ledger: VersionLedger::new(),
            log: RecordLog::new(),
            journal: None,
            sink,
        };
        for op in &replayed.ops {
            store.apply(op, &mut NullSink)?;
        }

        if replayed.truncate_needed {
            Logger::warn(
                Event::JournalTruncated,
                &[
                    ("path", journal_path(data_dir).display().to_string()),
                    ("valid_len", replayed.valid_len.to_string()),
                ],
            );
        }
        Logger::info(
            Event::JournalReplayed,
            &[("ops", replayed.ops.len().to_string())],
        );

        store.journal = Some(JournalWriter::open(data_dir, replayed.valid_len)?);
        Ok(store)
    }

    /// Registers a new site.
    ///
    /// # Errors
    ///
    /// `SiteAlreadyExists` on double registration.
    pub fn register(&mut self, site: SiteId) -> StoreResult<()> {
        if self.ledger.is_registered(site) {
            return Err(StoreError::SiteAlreadyExists(site));
        }
        self.journal_append(JournalOp::Register(RegisterPayload { site }))?;
        self.ledger.register(site)?;
        self.sink.record(ChangeEvent::register(site));
        Logger::info(Event::SiteRegistered, &[("site", site.to_string())]);
        Ok(())
    }

    /// Stores a value into the site's draft. A missing brand, product
    /// or option means a fill at that scope.
    ///
    /// Returns the draft version written.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn store(
        &mut self,
        site: SiteId,
        brand: Option<&str>,
        product: Option<&str>,
        option: Option<u64>,
        on_site: bool,
    ) -> StoreResult<VersionId> {
        // Existence check up front so an invalid op never reaches the
        // journal.
        self.ledger.current_draft(site)?;

        let key = OptionKey::from_parts(brand, product, option);
        self.journal_append(JournalOp::Store(StorePayload {
            site,
            scope: key.to_wire(),
            on_site,
        }))?;

        let version = self
            .log
            .store(&self.ledger, site, key.clone(), on_site, &mut *self.sink)?;
        Logger::info(
            Event::FactStored,
            &[
                ("site", site.to_string()),
                ("scope", key.to_string()),
                ("on_site", on_site.to_string()),
                ("version", version.to_string()),
            ],
        );
        Ok(version)
    }

    /// Resolves one concrete key against the published version.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn fetch(
        &self,
        site: SiteId,
        brand: &str,
        product: &str,
        option: u64,
    ) -> StoreResult<Resolved> {
        Resolver::fetch(&self.ledger, &self.log, site, brand, product, option)
    }

    /// Publishes the site's draft. Returns the now-visible version.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn publish(&mut self, site: SiteId) -> StoreResult<VersionId> {
        self.ledger.current_draft(site)?;
        self.journal_append(JournalOp::Publish(PublishPayload { site }))?;

        let visible = self.ledger.publish(site)?;
        self.sink.record(ChangeEvent::publish(site, visible));
        Logger::info(
            Event::Published,
            &[("site", site.to_string()), ("version", visible.to_string())],
        );
        Ok(visible)
    }

    /// Rolls the site back to `target`: stages a snapshot of the
    /// historical content as a fresh draft and publishes it. Returns
    /// the newly published version.
    ///
    /// # Errors
    ///
    /// - `UnknownSite` if the site was never registered.
    /// - `InvalidTarget` if `target` is zero or beyond the published
    ///   version; nothing is modified.
    pub fn rollback(&mut self, site: SiteId, target: VersionId) -> StoreResult<VersionId> {
        let published = self.ledger.current_published(site)?;
        if target.is_zero() || target > published {
            return Err(StoreError::InvalidTarget {
                site,
                target,
                published,
            });
        }
        self.journal_append(JournalOp::Rollback(RollbackPayload { site, target }))?;

        let visible = rollback::rollback(
            &mut self.ledger,
            &mut self.log,
            site,
            target,
            &mut *self.sink,
        )?;
        Logger::info(
            Event::RolledBack,
            &[
                ("site", site.to_string()),
                ("target", target.to_string()),
                ("version", visible.to_string()),
            ],
        );
        Ok(visible)
    }

    /// The version ledger, read-only.
    pub fn ledger(&self) -> &VersionLedger {
        &self.ledger
    }

    /// The record log, read-only. `latest_at_or_before` lives here for
    /// callers that need raw history.
    pub fn record_log(&self) -> &RecordLog {
        &self.log
    }

    /// Re-applies one journaled operation during replay. Journaled
    /// operations were validated before they were appended, so an
    /// error here means the journal and the apply path disagree.
    fn apply(&mut self, op: &JournalOp, sink: &mut dyn ChangeSink) -> StoreResult<()> {
        match op {
            JournalOp::Register(p) => self.ledger.register(p.site),
            JournalOp::Store(p) => self
                .log
                .store(&self.ledger, p.site, p.scope.to_key(), p.on_site, sink)
                .map(|_| ()),
            JournalOp::Publish(p) => self.ledger.publish(p.site).map(|_| ()),
            JournalOp::Rollback(p) => {
                rollback::rollback(&mut self.ledger, &mut self.log, p.site, p.target, sink)
                    .map(|_| ())
            }
        }
    }

    fn journal_append(&mut self, op: JournalOp) -> StoreResult<()> {
        if let Some(journal) = &mut self.journal {
            journal.append(&op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::{ChangeKind, MemoryChangelog};

    #[test]
    fn test_in_memory_round_trip() {
        let mut store = OptionStore::in_memory();
        let site = SiteId::new(8080);

        store.register(site).unwrap();
        store.store(site, Some("A"), Some("P"), Some(1), true).unwrap();
        store.publish(site).unwrap();

        let resolved = store.fetch(site, "A", "P", 1).unwrap();
        assert!(resolved.on_site);
    }

    #[test]
    fn test_register_twice_fails_without_reset() {
        let mut store = OptionStore::in_memory();
        let site = SiteId::new(1);

        store.register(site).unwrap();
        store.publish(site).unwrap();
        assert!(matches!(
            store.register(site),
            Err(StoreError::SiteAlreadyExists(_))
        ));
        assert_eq!(
            store.ledger().current_published(site).unwrap(),
            VersionId::new(1)
        );
    }

    #[test]
    fn test_changelog_receives_structured_events() {
        let changelog = MemoryChangelog::new();
        let mut store = OptionStore::in_memory_with_sink(Box::new(changelog.clone()));
        let site = SiteId::new(1);

        store.register(site).unwrap();
        store.store(site, Some("A"), Some("P"), Some(1), true).unwrap();
        store.publish(site).unwrap();
        store.rollback(site, VersionId::new(1)).unwrap();

        let kinds: Vec<ChangeKind> = changelog.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds[0], ChangeKind::Register);
        assert_eq!(kinds[1], ChangeKind::Store);
        assert_eq!(kinds[2], ChangeKind::Publish);
        // Rollback re-inserts the key, then reports itself.
        assert!(kinds.contains(&ChangeKind::Rollback {
            target: VersionId::new(1)
        }));
    }

    #[test]
    fn test_invalid_rollback_has_no_effect() {
        let mut store = OptionStore::in_memory();
        let site = SiteId::new(1);
        store.register(site).unwrap();

        assert!(matches!(
            store.rollback(site, VersionId::new(1)),
            Err(StoreError::InvalidTarget { .. })
        ));
        assert_eq!(store.ledger().current_draft(site).unwrap(), VersionId::new(1));
    }
}
