//! Rollback Engine - Snapshot reconstruction without time travel
//!
//! Rolling back never moves the published pointer backwards: it stages
//! a NEW draft whose content matches the historical snapshot, then
//! publishes it. Every prior version stays queryable forever.
//!
//! The reconstruction:
//! 1. Discard anything staged in the current draft (uncommitted by
//!    definition, so this is a pure deletion no reader can observe).
//! 2. Re-insert the value-as-of-target of every key that was live at
//!    the target, through the normal write path INCLUDING the cascade,
//!    fills before the more specific keys they cover. The ordering
//!    matters: a historical fill's cascade must not clobber a specific
//!    key that was live at the target, so specifics are written after
//!    the fills that cover them.
//! 3. Tombstone every other key ever touched up through this branch,
//!    so keys created after the target stop resolving instead of
//!    leaking through as stale specifics.
//! 4. Publish.

use std::collections::BTreeSet;

use crate::changelog::{ChangeEvent, ChangeSink};
use crate::error::{StoreError, StoreResult};
use crate::fact::{OptionKey, RecordLog};
use crate::ledger::{SiteId, VersionId, VersionLedger};

/// Stages a snapshot of `site` as of `target` into a fresh draft and
/// publishes it. Returns the newly published version.
///
/// # Errors
///
/// - `UnknownSite` if the site was never registered.
/// - `InvalidTarget` if `target` is zero or beyond the published
///   version. Nothing is modified in that case.
pub fn rollback(
    ledger: &mut VersionLedger,
    log: &mut RecordLog,
    site: SiteId,
    target: VersionId,
    sink: &mut dyn ChangeSink,
) -> StoreResult<VersionId> {
    let published = ledger.current_published(site)?;
    if target.is_zero() || target > published {
        return Err(StoreError::InvalidTarget {
            site,
            target,
            published,
        });
    }

    let draft = ledger.current_draft(site)?;
    log.discard_version(site, draft);

    // Everything ever touched on this branch. The draft was just
    // discarded, so this is exactly the published history.
    let touched = log.keys_touched_at_or_before(site, published);

    // Keys live at the target, with their value as of the target.
    // Fills go first so their cascades run before the specifics they
    // cover are re-inserted.
    let mut live: Vec<(OptionKey, bool)> = touched
        .iter()
        .filter_map(|key| {
            log.latest_at_or_before(site, target, key)
                .and_then(|fact| fact.value().as_set())
                .map(|on_site| (key.clone(), on_site))
        })
        .collect();
    live.sort_by(|(a, _), (b, _)| {
        a.specificity().cmp(&b.specificity()).then_with(|| a.cmp(b))
    });

    let reinserted: BTreeSet<&OptionKey> = live.iter().map(|(key, _)| key).collect();
    let masked: Vec<OptionKey> = touched
        .iter()
        .filter(|key| !reinserted.contains(key))
        .cloned()
        .collect();

    for (key, on_site) in &live {
        log.store(ledger, site, key.clone(), *on_site, sink)?;
    }
    for key in masked {
        log.insert_tombstone(site, draft, key, sink);
    }

    let visible = ledger.publish(site)?;
    sink.record(ChangeEvent::rollback(site, visible, target));
    Ok(visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::NullSink;
    use crate::fact::FactValue;
    use crate::resolver::Resolver;

    fn setup(site: SiteId) -> (VersionLedger, RecordLog) {
        let mut ledger = VersionLedger::new();
        ledger.register(site).unwrap();
        (ledger, RecordLog::new())
    }

    #[test]
    fn test_rollback_target_bounds() {
        let site = SiteId::new(1);
        let (mut ledger, mut log) = setup(site);
        ledger.publish(site).unwrap();

        // Zero and beyond-published targets are rejected.
        assert!(matches!(
            rollback(&mut ledger, &mut log, site, VersionId::ZERO, &mut NullSink),
            Err(StoreError::InvalidTarget { .. })
        ));
        assert!(matches!(
            rollback(&mut ledger, &mut log, site, VersionId::new(2), &mut NullSink),
            Err(StoreError::InvalidTarget { .. })
        ));

        // The rejected calls advanced nothing.
        assert_eq!(ledger.current_published(site).unwrap(), VersionId::new(1));
        assert_eq!(ledger.current_draft(site).unwrap(), VersionId::new(2));
    }

    #[test]
    fn test_rollback_discards_staged_draft() {
        let site = SiteId::new(1);
        let (mut ledger, mut log) = setup(site);
        let key = OptionKey::exact("A", "P", 1);

        log.store(&ledger, site, key.clone(), false, &mut NullSink).unwrap();
        ledger.publish(site).unwrap();

        // Stage an uncommitted draft write, then roll back.
        log.store(&ledger, site, key.clone(), true, &mut NullSink).unwrap();
        let visible =
            rollback(&mut ledger, &mut log, site, VersionId::new(1), &mut NullSink).unwrap();
        assert_eq!(visible, VersionId::new(2));

        // The staged `true` is gone; the snapshot carries the v1 value.
        let resolved = Resolver::fetch(&ledger, &log, site, "A", "P", 1).unwrap();
        assert!(!resolved.on_site);
        assert_eq!(resolved.effective_version(), VersionId::new(2));
    }

    #[test]
    fn test_keys_created_after_target_disappear() {
        let site = SiteId::new(1);
        let (mut ledger, mut log) = setup(site);

        log.store(&ledger, site, OptionKey::exact("A", "P", 1), false, &mut NullSink)
            .unwrap();
        ledger.publish(site).unwrap();
        log.store(&ledger, site, OptionKey::exact("A", "P", 2), false, &mut NullSink)
            .unwrap();
        ledger.publish(site).unwrap();

        rollback(&mut ledger, &mut log, site, VersionId::new(1), &mut NullSink).unwrap();

        // The post-target key resolves via the fallback again.
        let gone = Resolver::fetch(&ledger, &log, site, "A", "P", 2).unwrap();
        assert!(gone.is_fallback());
        assert!(gone.on_site);

        // An explicit tombstone was written for it at the new version.
        let fact = log
            .latest_at_or_before(site, VersionId::new(3), &OptionKey::exact("A", "P", 2))
            .unwrap();
        assert!(fact.is_tombstone());
        assert_eq!(fact.version(), VersionId::new(3));
    }

    #[test]
    fn test_historical_fill_still_shadows_historical_specifics() {
        let site = SiteId::new(1);
        let (mut ledger, mut log) = setup(site);
        let specific = OptionKey::exact("A", "P", 1);

        // v1: fill over the product (cascade finds nothing yet).
        log.store(&ledger, site, OptionKey::product_fill("A", "P"), false, &mut NullSink)
            .unwrap();
        ledger.publish(site).unwrap();

        // v2: specific override on top of the fill.
        log.store(&ledger, site, specific.clone(), true, &mut NullSink).unwrap();
        ledger.publish(site).unwrap();

        // v3: something unrelated, to roll back over.
        log.store(&ledger, site, OptionKey::exact("A", "Q", 1), true, &mut NullSink)
            .unwrap();
        ledger.publish(site).unwrap();

        // Roll back to v2: fill and override must coexist as they did,
        // with the fill re-inserted first so its cascade cannot
        // clobber the override.
        rollback(&mut ledger, &mut log, site, VersionId::new(2), &mut NullSink).unwrap();

        let overridden = Resolver::fetch(&ledger, &log, site, "A", "P", 1).unwrap();
        assert!(overridden.on_site);
        let filled = Resolver::fetch(&ledger, &log, site, "A", "P", 2).unwrap();
        assert!(!filled.on_site);
    }

    #[test]
    fn test_rollback_preserves_history() {
        let site = SiteId::new(1);
        let (mut ledger, mut log) = setup(site);
        let key = OptionKey::exact("A", "P", 1);

        log.store(&ledger, site, key.clone(), true, &mut NullSink).unwrap();
        ledger.publish(site).unwrap();
        log.store(&ledger, site, key.clone(), false, &mut NullSink).unwrap();
        ledger.publish(site).unwrap();

        rollback(&mut ledger, &mut log, site, VersionId::new(1), &mut NullSink).unwrap();

        // Both original facts are still there at their versions.
        let v1 = log.latest_at_or_before(site, VersionId::new(1), &key).unwrap();
        assert_eq!(v1.value(), FactValue::Set(true));
        let v2 = log.latest_at_or_before(site, VersionId::new(2), &key).unwrap();
        assert_eq!(v2.value(), FactValue::Set(false));
        // And the reconstruction landed on top.
        let v3 = log.latest_at_or_before(site, VersionId::new(3), &key).unwrap();
        assert_eq!(v3.value(), FactValue::Set(true));
    }
}
