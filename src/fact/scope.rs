//! Scope - Tagged wildcard fields and the three-part option key
//!
//! A key field is either a concrete value or `Any`, the "fill" scope
//! covering every value of that field. The wildcard sentinels of the
//! durable form (`brand = "*"`, `product = "*"`, `option = 0`) exist
//! only at the persistence and CLI boundary; inside the core a field is
//! always a tagged `Scope`, so no comparison can confuse a sentinel
//! with a real value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for a wildcard brand or product in the durable form.
pub const WILDCARD_TEXT: &str = "*";

/// Sentinel for a wildcard option id in the durable form.
pub const WILDCARD_OPTION: u64 = 0;

/// One field of an option key: a concrete value or the fill wildcard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope<T> {
    /// A concrete field value.
    Exact(T),
    /// The fill wildcard covering every value of this field.
    Any,
}

impl<T: PartialEq> Scope<T> {
    /// Returns true if this field is the wildcard.
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Scope::Any)
    }

    /// Returns true if `self` covers `other`: the wildcard covers
    /// everything, a concrete value covers only itself.
    pub fn covers(&self, other: &Scope<T>) -> bool {
        match (self, other) {
            (Scope::Any, _) => true,
            (Scope::Exact(a), Scope::Exact(b)) => a == b,
            (Scope::Exact(_), Scope::Any) => false,
        }
    }
}

/// The three-part key of an option fact.
///
/// A key with at least one wildcard field is a "fill": a default that
/// applies to every concrete key it covers. Keys order by brand, then
/// product, then option, with concrete values before the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionKey {
    pub brand: Scope<String>,
    pub product: Scope<String>,
    pub option: Scope<u64>,
}

impl OptionKey {
    /// Builds a key from optional parts; a missing part means a fill
    /// at that scope.
    pub fn from_parts(
        brand: Option<&str>,
        product: Option<&str>,
        option: Option<u64>,
    ) -> Self {
        Self {
            brand: brand.map_or(Scope::Any, |b| Scope::Exact(b.to_string())),
            product: product.map_or(Scope::Any, |p| Scope::Exact(p.to_string())),
            option: option.map_or(Scope::Any, Scope::Exact),
        }
    }

    /// A fully concrete key.
    pub fn exact(brand: &str, product: &str, option: u64) -> Self {
        Self::from_parts(Some(brand), Some(product), Some(option))
    }

    /// Fill over every option of one product.
    pub fn product_fill(brand: &str, product: &str) -> Self {
        Self::from_parts(Some(brand), Some(product), None)
    }

    /// Fill over every product of one brand.
    pub fn brand_fill(brand: &str) -> Self {
        Self::from_parts(Some(brand), None, None)
    }

    /// The site-wide default scope.
    pub fn site_fill() -> Self {
        Self::from_parts(None, None, None)
    }

    /// Returns true if any field is a wildcard.
    #[inline]
    pub fn is_fill(&self) -> bool {
        self.brand.is_any() || self.product.is_any() || self.option.is_any()
    }

    /// Number of concrete fields, 0 (site-wide) through 3 (exact).
    pub fn specificity(&self) -> u8 {
        let mut n = 0;
        if !self.brand.is_any() {
            n += 1;
        }
        if !self.product.is_any() {
            n += 1;
        }
        if !self.option.is_any() {
            n += 1;
        }
        n
    }

    /// Returns true if `self` covers `other`: every concrete field of
    /// `self` matches the same field of `other`, and wildcard fields of
    /// `self` cover anything. A key covers itself.
    pub fn covers(&self, other: &OptionKey) -> bool {
        self.brand.covers(&other.brand)
            && self.product.covers(&other.product)
            && self.option.covers(&other.option)
    }

    /// Converts to the durable sentinel form.
    pub fn to_wire(&self) -> WireKey {
        WireKey {
            brand: match &self.brand {
                Scope::Exact(b) => b.clone(),
                Scope::Any => WILDCARD_TEXT.to_string(),
            },
            product: match &self.product {
                Scope::Exact(p) => p.clone(),
                Scope::Any => WILDCARD_TEXT.to_string(),
            },
            option: match self.option {
                Scope::Exact(o) => o,
                Scope::Any => WILDCARD_OPTION,
            },
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wire = self.to_wire();
        write!(f, "({}, {}, {})", wire.brand, wire.product, wire.option)
    }
}

/// The sentinel form of an option key as it appears in the journal and
/// in changelog events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireKey {
    pub brand: String,
    pub product: String,
    pub option: u64,
}

impl WireKey {
    /// Converts back to the tagged in-core form.
    pub fn to_key(&self) -> OptionKey {
        OptionKey {
            brand: if self.brand == WILDCARD_TEXT {
                Scope::Any
            } else {
                Scope::Exact(self.brand.clone())
            },
            product: if self.product == WILDCARD_TEXT {
                Scope::Any
            } else {
                Scope::Exact(self.product.clone())
            },
            option: if self.option == WILDCARD_OPTION {
                Scope::Any
            } else {
                Scope::Exact(self.option)
            },
        }
    }
}
