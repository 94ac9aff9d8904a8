//! AtVenu entities as returned by the GraphQL API.
//!
//! Field names follow the aliases used in [`super::queries`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use settlement_sync_core::{AccountId, MerchItemId, MerchVariantId, ShowId, TourId};

// =============================================================================
// Hierarchy
// =============================================================================

/// An artist account in the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account UUID.
    #[serde(rename = "uuid")]
    pub id: AccountId,
    /// Artist name.
    #[serde(rename = "artistName")]
    pub display_name: String,
}

/// A tour belonging to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    /// Tour UUID.
    #[serde(rename = "uuid")]
    pub id: TourId,
    /// Tour name.
    #[serde(rename = "tourName")]
    pub name: String,
}

/// Venue location of a show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueLocation {
    /// Venue capacity.
    pub capacity: Option<i64>,
    /// City.
    pub city: Option<String>,
    /// State/province.
    pub state_province: Option<String>,
    /// Country.
    pub country: Option<String>,
}

impl VenueLocation {
    /// `"<city>, <state>, <country>"`, skipping missing parts.
    #[must_use]
    pub fn description(&self) -> String {
        [&self.city, &self.state_province, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Currency a show settles in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// ISO 4217 code.
    pub code: Option<String>,
}

/// A show as it appears in a tour's `shows` connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowNode {
    /// Show UUID.
    pub uuid: ShowId,
    /// First day of the show.
    pub show_date: NaiveDate,
    /// Last day of a multi-day show.
    pub show_end_date: Option<NaiveDate>,
    /// Settlement state.
    pub state: Option<String>,
    /// Reported attendance.
    pub attendance: Option<i64>,
    /// Reported capacity.
    pub capacity: Option<i64>,
    /// Settlement currency.
    pub currency_format: Option<CurrencyFormat>,
    /// Venue location.
    pub location: Option<VenueLocation>,
}

/// A show with the account and tour it was reached through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    /// Show UUID.
    pub id: ShowId,
    /// First day of the show.
    pub date: NaiveDate,
    /// Last day of a multi-day show.
    pub end_date: Option<NaiveDate>,
    /// Settlement state.
    pub state: Option<String>,
    /// Reported attendance.
    pub attendance: Option<i64>,
    /// Reported capacity.
    pub capacity: Option<i64>,
    /// ISO 4217 currency code.
    pub currency_code: Option<String>,
    /// Venue location.
    pub venue_location: VenueLocation,
    /// Owning account.
    pub account: Account,
    /// Owning tour.
    pub tour: Tour,
}

impl ShowNode {
    /// Attach the owning account and tour.
    #[must_use]
    pub fn into_show(self, account: &Account, tour: &Tour) -> Show {
        Show {
            id: self.uuid,
            date: self.show_date,
            end_date: self.show_end_date,
            state: self.state,
            attendance: self.attendance,
            capacity: self.capacity,
            currency_code: self.currency_format.and_then(|c| c.code),
            venue_location: self.location.unwrap_or_default(),
            account: account.clone(),
            tour: tour.clone(),
        }
    }
}

// =============================================================================
// Merchandise
// =============================================================================

/// Product type of a merchandise item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    /// Product type name.
    pub name: Option<String>,
}

/// A merchandise item in an account's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchItem {
    /// Item UUID.
    #[serde(rename = "uuid")]
    pub id: MerchItemId,
    /// Item name.
    pub name: String,
    /// Catalog category.
    pub category: Option<String>,
    /// Product type.
    pub product_type: Option<ProductType>,
    /// Sellable variants, in catalog order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub merch_variants: Vec<MerchVariant>,
}

/// A sellable SKU-level variant of a merchandise item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchVariant {
    /// Variant UUID, unique across the account's catalog.
    #[serde(rename = "uuid")]
    pub id: MerchVariantId,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// Size label.
    pub size: Option<String>,
    /// Catalog unit price.
    #[serde(rename = "price")]
    pub unit_price: Option<Decimal>,
}

// =============================================================================
// Settlement counts
// =============================================================================

/// An external add of units during a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchAdd {
    /// Units added.
    pub quantity: Option<i64>,
}

/// One count line from a show's settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountRecord {
    /// Variant this count refers to (lookup key, not ownership).
    #[serde(rename = "merchVariantUuid")]
    pub variant_id: Option<MerchVariantId>,
    /// Per-show price override.
    pub price_override: Option<Decimal>,
    /// Units counted in.
    pub count_in: Option<i64>,
    /// Units counted out.
    pub count_out: Option<i64>,
    /// Complimentary units.
    pub comps: Option<i64>,
    /// External adds.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub merch_adds: Vec<MerchAdd>,
}

impl CountRecord {
    /// Units sold: in + adds - out - comps, nulls as zero.
    #[must_use]
    pub fn sold_quantity(&self) -> i64 {
        settlement_sync_core::sold_quantity(
            self.count_in,
            self.count_out,
            self.comps,
            self.merch_adds.iter().map(|add| add.quantity),
        )
    }
}

/// Deserialize a JSON `null` list as empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_count_record_with_nulls() {
        let count: CountRecord = serde_json::from_value(json!({
            "merchVariantUuid": "00000000-0000-0000-0000-000000000001",
            "priceOverride": null,
            "countIn": 10,
            "countOut": null,
            "comps": 2,
            "merchAdds": null
        }))
        .unwrap();
        assert!(count.merch_adds.is_empty());
        assert_eq!(count.sold_quantity(), 8);
    }

    #[test]
    fn test_count_record_adds() {
        let count: CountRecord = serde_json::from_value(json!({
            "merchVariantUuid": null,
            "priceOverride": "12.50",
            "countIn": 20,
            "countOut": 5,
            "comps": null,
            "merchAdds": [{"quantity": 4}, {"quantity": null}]
        }))
        .unwrap();
        assert_eq!(count.variant_id, None);
        assert_eq!(count.price_override, Some(Decimal::new(1250, 2)));
        assert_eq!(count.sold_quantity(), 19);
    }

    #[test]
    fn test_variant_price_accepts_number() {
        let variant: MerchVariant = serde_json::from_value(json!({
            "uuid": "00000000-0000-0000-0000-000000000002",
            "sku": "TEE-BLK-M",
            "size": "M",
            "price": 35
        }))
        .unwrap();
        assert_eq!(variant.unit_price, Some(Decimal::from(35)));
    }

    #[test]
    fn test_venue_description_skips_missing_parts() {
        let location = VenueLocation {
            capacity: None,
            city: Some("Austin".to_string()),
            state_province: None,
            country: Some("US".to_string()),
        };
        assert_eq!(location.description(), "Austin, US");
        assert_eq!(VenueLocation::default().description(), "");
    }

    #[test]
    fn test_show_node_attaches_account_and_tour() {
        let node: ShowNode = serde_json::from_value(json!({
            "uuid": "00000000-0000-0000-0000-000000000003",
            "showDate": "2024-06-01",
            "showEndDate": null,
            "state": "settled",
            "attendance": 900,
            "capacity": 1000,
            "currencyFormat": {"code": "USD"},
            "location": {"capacity": 1000, "city": "Austin", "stateProvince": "TX", "country": "US"}
        }))
        .unwrap();
        let account = Account {
            id: AccountId::new(uuid::Uuid::from_u128(10)),
            display_name: "BandX".to_string(),
        };
        let tour = Tour {
            id: TourId::new(uuid::Uuid::from_u128(20)),
            name: "TourY".to_string(),
        };
        let show = node.into_show(&account, &tour);
        assert_eq!(show.account, account);
        assert_eq!(show.tour, tour);
        assert_eq!(show.currency_code.as_deref(), Some("USD"));
        assert_eq!(show.venue_location.description(), "Austin, TX, US");
    }
}
