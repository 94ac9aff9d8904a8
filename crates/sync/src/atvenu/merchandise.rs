//! Merchandise catalog collector and variant lookup.

use std::collections::HashMap;

use serde::Deserialize;
use settlement_sync_core::{AccountId, MerchVariantId};
use tracing::instrument;

use super::AtVenuError;
use super::client::AtVenuClient;
use super::pagination::{Connection, collect_pages};
use super::queries::{MERCHANDISE_QUERY, MerchandiseVariables};
use super::types::{MerchItem, MerchVariant};

#[derive(Debug, Deserialize)]
struct MerchandiseData {
    account: Option<AccountMerchNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountMerchNode {
    merch_items: Connection<MerchItem>,
}

/// An account's merchandise items, indexed by variant.
///
/// Lookups resolve to the first item (in catalog order) that lists the variant.
#[derive(Debug, Clone, Default)]
pub struct MerchCatalog {
    items: Vec<MerchItem>,
    /// variant id -> (item index, variant index)
    index: HashMap<MerchVariantId, (usize, usize)>,
}

impl MerchCatalog {
    /// Build a catalog from fetched items.
    #[must_use]
    pub fn new(items: Vec<MerchItem>) -> Self {
        let mut index = HashMap::new();
        for (item_idx, item) in items.iter().enumerate() {
            for (variant_idx, variant) in item.merch_variants.iter().enumerate() {
                index.entry(variant.id).or_insert((item_idx, variant_idx));
            }
        }
        Self { items, index }
    }

    /// Find the item and variant for a variant id.
    #[must_use]
    pub fn find_variant(&self, id: MerchVariantId) -> Option<(&MerchItem, &MerchVariant)> {
        let &(item_idx, variant_idx) = self.index.get(&id)?;
        let item = self.items.get(item_idx)?;
        let variant = item.merch_variants.get(variant_idx)?;
        Some((item, variant))
    }

    /// Number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl AtVenuClient {
    /// Fetch an account's full merchandise catalog.
    ///
    /// # Errors
    ///
    /// Returns `AtVenuError::NodeNotFound` if the account does not exist, or
    /// any error from a page request.
    #[instrument(skip(self, account_id), fields(account_id = %account_id))]
    pub async fn fetch_merchandise(&self, account_id: AccountId) -> Result<MerchCatalog, AtVenuError> {
        let items = collect_pages(|cursor| self.merchandise_page(account_id, cursor)).await?;
        tracing::info!(items = items.len(), "Fetched merchandise items");
        Ok(MerchCatalog::new(items))
    }

    async fn merchandise_page(
        &self,
        account_id: AccountId,
        cursor: Option<String>,
    ) -> Result<Connection<MerchItem>, AtVenuError> {
        let variables = MerchandiseVariables {
            uuid: account_id,
            cursor,
        };
        let data: MerchandiseData = self
            .execute("merchandise", MERCHANDISE_QUERY, variables)
            .await?;
        data.account
            .map(|account| account.merch_items)
            .ok_or_else(|| AtVenuError::NodeNotFound {
                kind: "Account",
                id: account_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use settlement_sync_core::MerchItemId;
    use uuid::Uuid;

    use super::*;

    fn variant(n: u128, sku: &str) -> MerchVariant {
        MerchVariant {
            id: MerchVariantId::new(Uuid::from_u128(n)),
            sku: Some(sku.to_string()),
            size: None,
            unit_price: None,
        }
    }

    fn item(n: u128, name: &str, variants: Vec<MerchVariant>) -> MerchItem {
        MerchItem {
            id: MerchItemId::new(Uuid::from_u128(n)),
            name: name.to_string(),
            category: None,
            product_type: None,
            merch_variants: variants,
        }
    }

    #[test]
    fn test_find_variant_across_items() {
        let catalog = MerchCatalog::new(vec![
            item(1, "Tee", vec![variant(11, "TEE-S"), variant(12, "TEE-M")]),
            item(2, "Hat", vec![variant(21, "HAT")]),
        ]);

        let (found_item, found_variant) = catalog
            .find_variant(MerchVariantId::new(Uuid::from_u128(21)))
            .unwrap_or_else(|| panic!("variant should be indexed"));
        assert_eq!(found_item.name, "Hat");
        assert_eq!(found_variant.sku.as_deref(), Some("HAT"));
        assert_eq!(catalog.item_count(), 2);
    }

    #[test]
    fn test_unknown_variant_is_none() {
        let catalog = MerchCatalog::new(vec![item(1, "Tee", vec![variant(11, "TEE-S")])]);
        assert!(catalog.find_variant(MerchVariantId::new(Uuid::from_u128(99))).is_none());
    }

    #[test]
    fn test_duplicate_variant_resolves_to_first_item() {
        let catalog = MerchCatalog::new(vec![
            item(1, "First", vec![variant(11, "A")]),
            item(2, "Second", vec![variant(11, "B")]),
        ]);
        let (found_item, _) = catalog
            .find_variant(MerchVariantId::new(Uuid::from_u128(11)))
            .unwrap_or_else(|| panic!("variant should be indexed"));
        assert_eq!(found_item.name, "First");
    }
}
