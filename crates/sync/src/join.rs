//! Join settlement counts against the merchandise catalog.
//!
//! Pure: takes already-fetched data, performs no I/O.

use serde::Serialize;
use settlement_sync_core::{AccountId, MerchVariantId, ShowId, SoldRecord, UnitPrice};

use crate::atvenu::{CountRecord, MerchCatalog, Show};

/// A count whose variant is not in the account's catalog.
///
/// Such counts produce no [`SoldRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinMiss {
    /// Show the count belongs to.
    pub show_id: ShowId,
    /// Account whose catalog was searched.
    pub account_id: AccountId,
    /// Variant the count referenced (`None` if the count had no variant).
    pub variant_id: Option<MerchVariantId>,
}

/// Result of joining one show's counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinOutcome {
    /// One record per matched count, in count order.
    pub records: Vec<SoldRecord>,
    /// Counts that matched nothing.
    pub misses: Vec<JoinMiss>,
}

/// Derive sold records for one show.
#[must_use]
pub fn join_show_counts(show: &Show, counts: &[CountRecord], catalog: &MerchCatalog) -> JoinOutcome {
    let mut outcome = JoinOutcome::default();
    let venue = show.venue_location.description();

    for count in counts {
        let Some((item, variant)) = count.variant_id.and_then(|id| catalog.find_variant(id)) else {
            outcome.misses.push(JoinMiss {
                show_id: show.id,
                account_id: show.account.id,
                variant_id: count.variant_id,
            });
            continue;
        };

        outcome.records.push(SoldRecord {
            show_id: show.id,
            variant_id: variant.id,
            band_name: show.account.display_name.clone(),
            tour_name: show.tour.name.clone(),
            venue_description: venue.clone(),
            product_name: item.name.clone(),
            size: variant.size.clone(),
            sku: variant.sku.clone(),
            count_in: count.count_in.unwrap_or(0),
            count_out: count.count_out.unwrap_or(0),
            sold_quantity: count.sold_quantity(),
            show_date: show.date,
            unit_price: UnitPrice::resolve(count.price_override, variant.unit_price),
        });
    }

    outcome
}
