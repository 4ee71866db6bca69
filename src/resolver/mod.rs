//! Resolver - The five-level fill hierarchy read path
//!
//! A fetch walks the specificity ladder against the site's published
//! version and takes the first LIVE value:
//!
//! 1. exact `(brand, product, option)`
//! 2. product fill `(brand, product, *)`
//! 3. brand fill `(brand, *, *)`
//! 4. site-wide fill `(*, *, *)`
//! 5. the hard-coded fallback `true`
//!
//! Specificity beats recency: an exact fact from version 1 wins over a
//! fill from version 9 (the write path's tombstone cascade keeps that
//! rule honest). A tombstone at a level is absent AT THAT LEVEL and
//! never short-circuits to the fallback; resolution continues at the
//! next, less specific level.
//!
//! Reads only ever touch data at or below the published version, so a
//! concurrent draft write is invisible to them by construction.

use crate::error::StoreResult;
use crate::fact::{OptionKey, RecordLog};
use crate::ledger::{SiteId, VersionId, VersionLedger};

/// The setting applied when no fact at any level covers a key.
pub const FALLBACK_ON_SITE: bool = true;

/// Where a resolved value came from.
///
/// The fallback is a distinct marker rather than a fact version: no
/// real fact corresponds to it, and conflating it with "real data at
/// the newest version" hides the difference between "no data" and
/// "data". Callers that want the historical reporting behavior can use
/// [`Resolved::effective_version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A stored fact produced the value.
    Fact(VersionId),
    /// Nothing covered the key; the hard-coded default applied.
    /// Carries the published version the read was evaluated against.
    Fallback { published: VersionId },
}

/// A resolved on_site setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub on_site: bool,
    pub source: ResolutionSource,
}

impl Resolved {
    /// Returns true if the hard-coded fallback produced the value.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ResolutionSource::Fallback { .. })
    }

    /// The version of the producing fact, or the published version for
    /// the fallback case.
    pub fn effective_version(&self) -> VersionId {
        match self.source {
            ResolutionSource::Fact(version) => version,
            ResolutionSource::Fallback { published } => published,
        }
    }
}

/// Stateless read-path resolver.
///
/// A pure function over the ledger and the record log; identical
/// inputs resolve identically every time.
pub struct Resolver;

impl Resolver {
    /// Resolves one concrete key against the site's published version.
    ///
    /// # Errors
    ///
    /// `UnknownSite` if the site was never registered.
    pub fn fetch(
        ledger: &VersionLedger,
        log: &RecordLog,
        site: SiteId,
        brand: &str,
        product: &str,
        option: u64,
    ) -> StoreResult<Resolved> {
        let published = ledger.current_published(site)?;

        let ladder = [
            OptionKey::exact(brand, product, option),
            OptionKey::product_fill(brand, product),
            OptionKey::brand_fill(brand),
            OptionKey::site_fill(),
        ];

        for key in &ladder {
            if let Some(fact) = log.latest_at_or_before(site, published, key) {
                if let Some(on_site) = fact.value().as_set() {
                    return Ok(Resolved {
                        on_site,
                        source: ResolutionSource::Fact(fact.version()),
                    });
                }
                // Tombstone: absent at this level, keep descending.
            }
        }

        Ok(Resolved {
            on_site: FALLBACK_ON_SITE,
            source: ResolutionSource::Fallback { published },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::NullSink;
    use crate::error::StoreError;

    fn setup(site: SiteId) -> (VersionLedger, RecordLog) {
        let mut ledger = VersionLedger::new();
        ledger.register(site).unwrap();
        (ledger, RecordLog::new())
    }

    #[test]
    fn test_exact_fact_wins_over_fill() {
        let site = SiteId::new(1);
        let (mut ledger, mut log) = setup(site);

        log.store(&ledger, site, OptionKey::site_fill(), false, &mut NullSink)
            .unwrap();
        log.store(&ledger, site, OptionKey::exact("A", "P", 1), true, &mut NullSink)
            .unwrap();
        ledger.publish(site).unwrap();

        let resolved = Resolver::fetch(&ledger, &log, site, "A", "P", 1).unwrap();
        assert!(resolved.on_site);
        assert_eq!(resolved.source, ResolutionSource::Fact(VersionId::new(1)));

        // A different key falls to the site-wide fill.
        let other = Resolver::fetch(&ledger, &log, site, "B", "Q", 9).unwrap();
        assert!(!other.on_site);
    }

    #[test]
    fn test_tombstone_continues_to_next_level() {
        let site = SiteId::new(1);
        let (mut ledger, mut log) = setup(site);

        // Brand fill first, then a product fill that the brand fill
        // later tombstones via the cascade.
        log.store(&ledger, site, OptionKey::product_fill("A", "P"), true, &mut NullSink)
            .unwrap();
        ledger.publish(site).unwrap();
        log.store(&ledger, site, OptionKey::brand_fill("A"), false, &mut NullSink)
            .unwrap();
        ledger.publish(site).unwrap();

        // The product fill is tombstoned; resolution must continue to
        // the brand fill, not bail out to the fallback.
        let resolved = Resolver::fetch(&ledger, &log, site, "A", "P", 5).unwrap();
        assert!(!resolved.on_site);
        assert_eq!(resolved.source, ResolutionSource::Fact(VersionId::new(2)));
    }

    #[test]
    fn test_fallback_is_a_distinct_marker() {
        let site = SiteId::new(1);
        let (mut ledger, log) = setup(site);
        ledger.publish(site).unwrap();
        ledger.publish(site).unwrap();

        let resolved = Resolver::fetch(&ledger, &log, site, "A", "P", 1).unwrap();
        assert!(resolved.on_site);
        assert!(resolved.is_fallback());
        assert_eq!(
            resolved.source,
            ResolutionSource::Fallback {
                published: VersionId::new(2)
            }
        );
        assert_eq!(resolved.effective_version(), VersionId::new(2));
    }

    #[test]
    fn test_nothing_visible_before_first_publish() {
        let site = SiteId::new(1);
        let (ledger, mut log) = setup(site);

        log.store(&ledger, site, OptionKey::exact("A", "P", 1), false, &mut NullSink)
            .unwrap();

        // The draft is invisible; only the fallback applies.
        let resolved = Resolver::fetch(&ledger, &log, site, "A", "P", 1).unwrap();
        assert!(resolved.is_fallback());
        assert!(resolved.on_site);
    }

    #[test]
    fn test_unknown_site_fetch_fails() {
        let ledger = VersionLedger::new();
        let log = RecordLog::new();
        let err = Resolver::fetch(&ledger, &log, SiteId::new(7), "A", "P", 1).unwrap_err();
        assert!(matches!(err, StoreError::UnknownSite(_)));
    }
}
