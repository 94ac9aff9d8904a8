//! Band include/exclude filtering of sold records.
//!
//! Names are compared case-insensitively after trimming. An empty include
//! list admits every band; exclusions always win.

use settlement_sync::SoldRecord;

/// Which bands make it into the export.
#[derive(Debug, Clone, Default)]
pub struct BandFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl BandFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include: normalize(include),
            exclude: normalize(exclude),
        }
    }

    pub fn allows(&self, band: &str) -> bool {
        let band = band.trim().to_lowercase();
        if self.exclude.contains(&band) {
            return false;
        }
        self.include.is_empty() || self.include.contains(&band)
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Keep only records whose band is allowed, preserving order.
    pub fn apply(&self, records: Vec<SoldRecord>) -> Vec<SoldRecord> {
        if self.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|record| self.allows(&record.band_name))
            .collect()
    }
}

fn normalize(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use settlement_sync::UnitPrice;
    use settlement_sync_core::{MerchVariantId, ShowId};
    use uuid::Uuid;

    use super::*;

    fn record(band: &str) -> SoldRecord {
        SoldRecord {
            show_id: ShowId::new(Uuid::from_u128(1)),
            variant_id: MerchVariantId::new(Uuid::from_u128(2)),
            band_name: band.to_string(),
            tour_name: "Summer".to_string(),
            venue_description: String::new(),
            product_name: "Tee".to_string(),
            size: None,
            sku: Some("T1".to_string()),
            count_in: 5,
            count_out: 1,
            sold_quantity: 4,
            show_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default(),
            unit_price: UnitPrice::Catalog(Decimal::new(20, 0)),
        }
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let filter = BandFilter::default();
        assert!(filter.allows("Anyone"));
        assert_eq!(filter.apply(vec![record("A"), record("B")]).len(), 2);
    }

    #[test]
    fn test_include_is_case_insensitive() {
        let filter = BandFilter::new(vec![" bandx ".to_string()], Vec::new());
        assert!(filter.allows("BandX"));
        assert!(!filter.allows("BandZ"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = BandFilter::new(vec!["BandX".to_string()], vec!["bandx".to_string()]);
        assert!(!filter.allows("BandX"));
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = BandFilter::new(Vec::new(), vec!["Opener".to_string()]);
        let kept = filter.apply(vec![record("B"), record("Opener"), record("A")]);
        let bands: Vec<_> = kept.iter().map(|r| r.band_name.as_str()).collect();
        assert_eq!(bands, ["B", "A"]);
    }
}
