//! Unit price resolution for sold-quantity records.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Sentinel rendered when neither a count override nor a catalog price exists.
pub const PRICE_NOT_AVAILABLE: &str = "N/A";

/// The unit price attached to a sold record, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitPrice {
    /// Per-show price override entered on the settlement count.
    Override(Decimal),
    /// Catalog price of the merchandise variant.
    Catalog(Decimal),
    /// No price known.
    #[default]
    NotAvailable,
}

impl UnitPrice {
    /// Resolve a price: the override wins when present, then the catalog price.
    ///
    /// A zero override is still an override.
    #[must_use]
    pub const fn resolve(price_override: Option<Decimal>, catalog: Option<Decimal>) -> Self {
        match (price_override, catalog) {
            (Some(amount), _) => Self::Override(amount),
            (None, Some(amount)) => Self::Catalog(amount),
            (None, None) => Self::NotAvailable,
        }
    }

    /// The numeric amount, if any.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Override(amount) | Self::Catalog(amount) => Some(*amount),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.amount() {
            Some(amount) => write!(f, "{amount}"),
            None => f.write_str(PRICE_NOT_AVAILABLE),
        }
    }
}

impl Serialize for UnitPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
