//! Sold-quantity output records.

use chrono::NaiveDate;
use serde::Serialize;

use super::id::{MerchVariantId, ShowId};
use super::price::UnitPrice;

/// Units sold for one merchandise variant at one show.
///
/// Flattened from the show, its account and tour, the merchandise catalog and
/// the settlement count it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoldRecord {
    /// Show the count was taken at.
    pub show_id: ShowId,
    /// Variant the count refers to.
    pub variant_id: MerchVariantId,
    /// Artist/account display name.
    pub band_name: String,
    /// Tour name.
    pub tour_name: String,
    /// `"<city>, <state>, <country>"` from the show's location.
    pub venue_description: String,
    /// Merchandise item name.
    pub product_name: String,
    /// Variant size, if the variant has one.
    pub size: Option<String>,
    /// Variant SKU, if the variant has one.
    pub sku: Option<String>,
    /// Units counted in (null treated as zero).
    pub count_in: i64,
    /// Units counted out (null treated as zero).
    pub count_out: i64,
    /// Derived sold quantity, see [`sold_quantity`].
    pub sold_quantity: i64,
    /// Show date.
    pub show_date: NaiveDate,
    /// Resolved unit price.
    pub unit_price: UnitPrice,
}

impl SoldRecord {
    /// Inventory location label, `"<band> - <tour>"`.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{} - {}", self.band_name, self.tour_name)
    }
}

/// Compute units sold: `count_in + sum(adds) - count_out - comps`.
///
/// Every missing value counts as zero. Arithmetic saturates at the `i64`
/// bounds.
#[must_use]
pub fn sold_quantity<I>(
    count_in: Option<i64>,
    count_out: Option<i64>,
    comps: Option<i64>,
    adds: I,
) -> i64
where
    I: IntoIterator<Item = Option<i64>>,
{
    let added = adds
        .into_iter()
        .fold(0_i64, |total, q| total.saturating_add(q.unwrap_or(0)));
    count_in
        .unwrap_or(0)
        .saturating_add(added)
        .saturating_sub(count_out.unwrap_or(0))
        .saturating_sub(comps.unwrap_or(0))
}
