//! Resolution invariants
//!
//! - Specificity beats recency: a live fact at a more specific level
//!   always wins, regardless of version.
//! - Tombstones continue resolution at the next level, never
//!   short-circuit to the fallback.
//! - The fallback is an explicit marker, distinct from real facts.

use trunkdb::engine::OptionStore;
use trunkdb::ledger::{SiteId, VersionId};
use trunkdb::resolver::ResolutionSource;

#[test]
fn test_more_specific_level_always_wins() {
    let mut store = OptionStore::in_memory();
    let site = SiteId::new(1);
    store.register(site).unwrap();

    // v1: exact value. v2-v4: ever-broader fills over OTHER scopes
    // written later, which must not outrank the old exact fact for a
    // key they do not cover more specifically.
    store.store(site, Some("A"), Some("P"), Some(1), false).unwrap();
    store.publish(site).unwrap();
    store.store(site, None, None, None, true).unwrap();
    store.publish(site).unwrap();

    // The site-wide fill cascade tombstoned the exact key, so the fill
    // answers now.
    assert!(store.fetch(site, "A", "P", 1).unwrap().on_site);

    // Write the exact key again: it outranks the fill despite the
    // fill's tombstone cascade having run earlier.
    store.store(site, Some("A"), Some("P"), Some(1), false).unwrap();
    store.publish(site).unwrap();

    let resolved = store.fetch(site, "A", "P", 1).unwrap();
    assert!(!resolved.on_site);
    assert_eq!(resolved.source, ResolutionSource::Fact(VersionId::new(3)));

    // Keys only the fill covers still resolve through it.
    assert!(store.fetch(site, "B", "Q", 9).unwrap().on_site);
}

#[test]
fn test_resolution_walks_all_four_levels() {
    let mut store = OptionStore::in_memory();
    let site = SiteId::new(1);
    store.register(site).unwrap();

    // One value at each level of the ladder, distinguished by scope.
    store.store(site, None, None, None, true).unwrap();
    store.store(site, Some("A"), None, None, false).unwrap();
    store.store(site, Some("A"), Some("P"), None, true).unwrap();
    store.store(site, Some("A"), Some("P"), Some(1), false).unwrap();
    store.publish(site).unwrap();

    // Exact key.
    assert!(!store.fetch(site, "A", "P", 1).unwrap().on_site);
    // Product fill for a sibling option.
    assert!(store.fetch(site, "A", "P", 2).unwrap().on_site);
    // Brand fill for a sibling product.
    assert!(!store.fetch(site, "A", "Q", 1).unwrap().on_site);
    // Site-wide fill for a different brand.
    assert!(store.fetch(site, "B", "X", 1).unwrap().on_site);
}

#[test]
fn test_tombstones_fall_through_every_level() {
    let mut store = OptionStore::in_memory();
    let site = SiteId::new(1);
    store.register(site).unwrap();

    // Product fill then exact value (fill first, so its cascade finds
    // nothing), then a brand fill whose cascade tombstones both.
    store.store(site, Some("A"), Some("P"), None, true).unwrap();
    store.store(site, Some("A"), Some("P"), Some(1), true).unwrap();
    store.publish(site).unwrap();
    store.store(site, Some("A"), None, None, false).unwrap();
    store.publish(site).unwrap();

    // Both more specific levels are tombstoned; resolution lands on
    // the brand fill instead of bailing to the fallback.
    let resolved = store.fetch(site, "A", "P", 1).unwrap();
    assert!(!resolved.on_site);
    assert_eq!(resolved.source, ResolutionSource::Fact(VersionId::new(2)));
}

#[test]
fn test_fallback_reports_itself_not_a_version() {
    let mut store = OptionStore::in_memory();
    let site = SiteId::new(1);
    store.register(site).unwrap();
    store.store(site, Some("A"), Some("P"), Some(1), false).unwrap();
    store.publish(site).unwrap();

    let resolved = store.fetch(site, "ZZZ", "none", 42).unwrap();
    assert!(resolved.on_site);
    assert_eq!(
        resolved.source,
        ResolutionSource::Fallback {
            published: VersionId::new(1)
        }
    );
}

#[test]
fn test_empty_publish_is_an_ordinary_version() {
    let mut store = OptionStore::in_memory();
    let site = SiteId::new(1);
    store.register(site).unwrap();

    store.store(site, Some("A"), Some("P"), Some(1), false).unwrap();
    store.publish(site).unwrap();

    // Publish twice with nothing staged.
    store.publish(site).unwrap();
    store.publish(site).unwrap();
    assert_eq!(
        store.ledger().current_published(site).unwrap(),
        VersionId::new(3)
    );

    // Readers see the same content through the empty versions.
    let resolved = store.fetch(site, "A", "P", 1).unwrap();
    assert!(!resolved.on_site);
    assert_eq!(resolved.source, ResolutionSource::Fact(VersionId::new(1)));
}

#[test]
fn test_draft_writes_are_invisible_to_readers() {
    let mut store = OptionStore::in_memory();
    let site = SiteId::new(1);
    store.register(site).unwrap();

    store.store(site, Some("A"), Some("P"), Some(1), true).unwrap();
    store.publish(site).unwrap();

    // Staged but unpublished flip.
    store.store(site, Some("A"), Some("P"), Some(1), false).unwrap();
    assert!(store.fetch(site, "A", "P", 1).unwrap().on_site);

    store.publish(site).unwrap();
    assert!(!store.fetch(site, "A", "P", 1).unwrap().on_site);
}
