//! RecordLog - Append-mostly store of versioned facts
//!
//! The log owns the write path, including the tombstone cascade: the
//! resolver always prefers a more specific key over a less specific
//! one regardless of recency, so storing a fill must first tombstone
//! every strictly-more-specific key that currently resolves to a live
//! value, or an old specific override would permanently shadow the
//! newer, broader fill.
//!
//! Facts are indexed per site as `key -> versions ascending`, the
//! structure both hot paths need: `latest_at_or_before` is a binary
//! search within one key's column, and the cascade scan walks the
//! site's keys once.

use std::collections::{BTreeMap, HashMap};

use crate::changelog::{ChangeEvent, ChangeSink};
use crate::error::StoreResult;
use crate::ledger::{SiteId, VersionId, VersionLedger};

use super::{FactValue, OptionFact, OptionKey};

/// Versions of one key, ascending by version, at most one entry per
/// version.
type VersionColumn = Vec<(VersionId, FactValue)>;

/// The versioned fact store of all sites.
#[derive(Debug, Default)]
pub struct RecordLog {
    facts: HashMap<SiteId, BTreeMap<OptionKey, VersionColumn>>,
}

impl RecordLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value (or a fill, if the key has wildcard fields) into
    /// the site's current draft.
    ///
    /// Fill writes first run the tombstone cascade over every strictly
    /// more specific key with a live value at or before the draft;
    /// keys already tombstoned, absent, or at broader scope are left
    /// alone. The insert then replaces any fact at the exact key within
    /// the draft (the draft is mutable; published versions are not,
    /// since no write ever targets them).
    ///
    /// Emits one store event plus one tombstone event per cascaded key.
    /// Returns the draft version written.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn store(
        &mut self,
        ledger: &VersionLedger,
        site: SiteId,
        key: OptionKey,
        on_site: bool,
        sink: &mut dyn ChangeSink,
    ) -> StoreResult<VersionId> {
        let draft = ledger.current_draft(site)?;
        if key.is_fill() {
            self.cascade(site, draft, &key, sink);
        }
        self.upsert(site, draft, key.clone(), FactValue::Set(on_site));
        sink.record(ChangeEvent::store(site, draft, key.to_wire(), on_site));
        Ok(draft)
    }

    /// Writes an explicit tombstone at the given version without
    /// cascading. Used by the rollback engine to mask keys that did
    /// not exist (or existed only as tombstones) at the target.
    pub fn insert_tombstone(
        &mut self,
        site: SiteId,
        version: VersionId,
        key: OptionKey,
        sink: &mut dyn ChangeSink,
    ) {
        self.upsert(site, version, key.clone(), FactValue::Tombstone);
        sink.record(ChangeEvent::tombstone(site, version, key.to_wire()));
    }

    /// The shared read primitive: the most recent fact at the exact
    /// key with `fact.version <= version`, or `None` if the key has no
    /// fact that old.
    ///
    /// Never interprets tombstones; returns exactly what was stored.
    pub fn latest_at_or_before(
        &self,
        site: SiteId,
        version: VersionId,
        key: &OptionKey,
    ) -> Option<OptionFact> {
        let column = self.facts.get(&site)?.get(key)?;
        let at = match column.binary_search_by_key(&version, |(v, _)| *v) {
            Ok(i) => i,
            Err(0) => return None,
            Err(i) => i - 1,
        };
        let (found_version, value) = column[at];
        Some(OptionFact::new(site, found_version, key.clone(), value))
    }

    /// Deletes every fact staged at exactly `version`. Only the
    /// rollback engine calls this, and only for the uncommitted draft,
    /// which no reader can observe.
    pub fn discard_version(&mut self, site: SiteId, version: VersionId) {
        let Some(keys) = self.facts.get_mut(&site) else {
            return;
        };
        keys.retain(|_, column| {
            if let Ok(i) = column.binary_search_by_key(&version, |(v, _)| *v) {
                column.remove(i);
            }
            !column.is_empty()
        });
    }

    /// Every key with at least one fact at or before `version`.
    pub fn keys_touched_at_or_before(
        &self,
        site: SiteId,
        version: VersionId,
    ) -> Vec<OptionKey> {
        match self.facts.get(&site) {
            Some(keys) => keys
                .iter()
                .filter(|(_, column)| column.first().is_some_and(|(v, _)| *v <= version))
                .map(|(key, _)| key.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Tombstones every strictly-more-specific key covered by `fill`
    /// whose latest fact at or before `draft` is a live value.
    fn cascade(
        &mut self,
        site: SiteId,
        draft: VersionId,
        fill: &OptionKey,
        sink: &mut dyn ChangeSink,
    ) {
        let shadowed: Vec<OptionKey> = match self.facts.get(&site) {
            Some(keys) => keys
                .keys()
                .filter(|key| {
                    key.specificity() > fill.specificity() && fill.covers(key)
                })
                .cloned()
                .collect(),
            None => return,
        };

        for key in shadowed {
            let live = self
                .latest_at_or_before(site, draft, &key)
                .is_some_and(|fact| !fact.is_tombstone());
            if live {
                self.insert_tombstone(site, draft, key, sink);
            }
        }
    }

    /// Inserts or replaces the fact at the exact `(site, version, key)`.
    fn upsert(&mut self, site: SiteId, version: VersionId, key: OptionKey, value: FactValue) {
        let column = self
            .facts
            .entry(site)
            .or_default()
            .entry(key)
            .or_default();
        match column.binary_search_by_key(&version, |(v, _)| *v) {
            Ok(i) => column[i].1 = value,
            Err(i) => column.insert(i, (version, value)),
        }
    }
}
