//! Account, tour and show collectors.
//!
//! Walks the organization → account → tour → show hierarchy one connection at
//! a time.

use serde::Deserialize;
use settlement_sync_core::{AccountId, DateRange, TourId};
use tracing::instrument;

use super::AtVenuError;
use super::client::AtVenuClient;
use super::pagination::{Connection, collect_pages};
use super::queries::{
    ACCOUNTS_QUERY, AccountsVariables, SHOWS_QUERY, ShowsVariables, TOURS_QUERY, ToursVariables,
};
use super::types::{Account, ShowNode, Tour};

// =============================================================================
// Response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct AccountsData {
    organization: OrganizationNode,
}

#[derive(Debug, Deserialize)]
struct OrganizationNode {
    accounts: Connection<Account>,
}

#[derive(Debug, Deserialize)]
struct ToursData {
    account: Option<AccountToursNode>,
}

#[derive(Debug, Deserialize)]
struct AccountToursNode {
    tours: Connection<Tour>,
}

#[derive(Debug, Deserialize)]
struct ShowsData {
    tour: Option<TourShowsNode>,
}

#[derive(Debug, Deserialize)]
struct TourShowsNode {
    shows: Connection<ShowNode>,
}

// =============================================================================
// AtVenuClient hierarchy methods
// =============================================================================

impl AtVenuClient {
    /// Fetch every account in the organization.
    ///
    /// # Errors
    ///
    /// Returns `AtVenuError` if any page fails.
    #[instrument(skip(self))]
    pub async fn fetch_accounts(&self) -> Result<Vec<Account>, AtVenuError> {
        collect_pages(|cursor| self.accounts_page(cursor)).await
    }

    /// Fetch every tour of an account.
    ///
    /// # Errors
    ///
    /// Returns `AtVenuError::NodeNotFound` if the account does not exist, or
    /// any error from a page request.
    #[instrument(skip(self, account_id), fields(account_id = %account_id))]
    pub async fn fetch_tours(&self, account_id: AccountId) -> Result<Vec<Tour>, AtVenuError> {
        collect_pages(|cursor| self.tours_page(account_id, cursor)).await
    }

    /// Fetch every show of a tour that overlaps `range`.
    ///
    /// Filtering is done by the server (`showsOverlap`), so a multi-day show
    /// starting before the range is included.
    ///
    /// # Errors
    ///
    /// Returns `AtVenuError::NodeNotFound` if the tour does not exist, or
    /// any error from a page request.
    #[instrument(skip(self, tour_id, range), fields(tour_id = %tour_id, range = %range))]
    pub async fn fetch_shows(
        &self,
        tour_id: TourId,
        range: DateRange,
    ) -> Result<Vec<ShowNode>, AtVenuError> {
        collect_pages(|cursor| self.shows_page(tour_id, range, cursor)).await
    }

    async fn accounts_page(
        &self,
        cursor: Option<String>,
    ) -> Result<Connection<Account>, AtVenuError> {
        let data: AccountsData = self
            .execute("accounts", ACCOUNTS_QUERY, AccountsVariables { cursor })
            .await?;
        Ok(data.organization.accounts)
    }

    async fn tours_page(
        &self,
        account_id: AccountId,
        cursor: Option<String>,
    ) -> Result<Connection<Tour>, AtVenuError> {
        let variables = ToursVariables {
            account_uuid: account_id,
            cursor,
        };
        let data: ToursData = self.execute("tours", TOURS_QUERY, variables).await?;
        data.account
            .map(|account| account.tours)
            .ok_or_else(|| AtVenuError::NodeNotFound {
                kind: "Account",
                id: account_id.to_string(),
            })
    }

    async fn shows_page(
        &self,
        tour_id: TourId,
        range: DateRange,
        cursor: Option<String>,
    ) -> Result<Connection<ShowNode>, AtVenuError> {
        let variables = ShowsVariables {
            tour_uuid: tour_id,
            start_date: range.start(),
            end_date: range.end(),
            cursor,
        };
        let data: ShowsData = self.execute("shows", SHOWS_QUERY, variables).await?;
        data.tour
            .map(|tour| tour.shows)
            .ok_or_else(|| AtVenuError::NodeNotFound {
                kind: "Tour",
                id: tour_id.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_accounts_payload_shape() {
        let data: AccountsData = serde_json::from_value(json!({
            "organization": {
                "accounts": {
                    "pageInfo": {"hasNextPage": true, "endCursor": "MjA"},
                    "nodes": [
                        {"uuid": "00000000-0000-0000-0000-000000000001", "artistName": "BandX"}
                    ]
                }
            }
        }))
        .unwrap();
        let accounts = data.organization.accounts;
        assert!(accounts.page_info.has_next_page);
        assert_eq!(accounts.nodes[0].display_name, "BandX");
    }

    #[test]
    fn test_null_tour_node_deserializes() {
        let data: ShowsData = serde_json::from_value(json!({"tour": null})).unwrap();
        assert!(data.tour.is_none());
    }
}
