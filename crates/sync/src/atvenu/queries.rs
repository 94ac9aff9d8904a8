//! GraphQL query documents and variables for the AtVenu API.
//!
//! Each document paginates one connection with `first`/`after`. Page sizes
//! are fixed in the documents and mirrored by the `*_PAGE_SIZE` constants.

use chrono::NaiveDate;
use serde::Serialize;
use settlement_sync_core::{AccountId, ShowId, TourId};

/// Page size for the organization's accounts.
pub const ACCOUNTS_PAGE_SIZE: usize = 20;
/// Page size for an account's tours.
pub const TOURS_PAGE_SIZE: usize = 200;
/// Page size for a tour's shows.
pub const SHOWS_PAGE_SIZE: usize = 200;
/// Page size for an account's merchandise items.
pub const MERCHANDISE_PAGE_SIZE: usize = 200;
/// Page size for a settlement's counts.
pub const COUNTS_PAGE_SIZE: usize = 100;

// =============================================================================
// Hierarchy queries
// =============================================================================

/// All accounts in the organization.
pub const ACCOUNTS_QUERY: &str = r"
query accounts($cursor: String) {
  organization {
    accounts(first: 20, after: $cursor) {
      pageInfo {
        hasNextPage
        endCursor
      }
      nodes {
        uuid
        artistName: name
      }
    }
  }
}
";

/// Tours of one account.
pub const TOURS_QUERY: &str = r"
query tours($accountUuid: UUID!, $cursor: String) {
  account: node(uuid: $accountUuid) {
    ... on Account {
      tours(first: 200, after: $cursor) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          uuid
          tourName: name
        }
      }
    }
  }
}
";

/// Shows of one tour overlapping a date window.
pub const SHOWS_QUERY: &str = r"
query shows($tourUuid: UUID!, $startDate: Date!, $endDate: Date!, $cursor: String) {
  tour: node(uuid: $tourUuid) {
    ... on Tour {
      shows(first: 200, after: $cursor, showsOverlap: {start: $startDate, end: $endDate}) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          uuid
          showDate
          showEndDate
          state
          attendance
          capacity
          currencyFormat {
            code
          }
          location {
            capacity
            city
            stateProvince
            country
          }
        }
      }
    }
  }
}
";

// =============================================================================
// Merchandise and count queries
// =============================================================================

/// Merchandise catalog of one account.
pub const MERCHANDISE_QUERY: &str = r"
query merchandise($uuid: UUID!, $cursor: String) {
  account: node(uuid: $uuid) {
    ... on Account {
      uuid
      merchItems(first: 200, after: $cursor) {
        pageInfo {
          hasNextPage
          endCursor
        }
        nodes {
          name
          category
          uuid
          productType {
            name
          }
          merchVariants {
            sku
            size
            uuid
            price
          }
        }
      }
    }
  }
}
";

/// Settlement counts of one show.
pub const COUNTS_QUERY: &str = r"
query counts($uuid: UUID!, $cursor: String) {
  show: node(uuid: $uuid) {
    ... on Show {
      settlements {
        path
        mainCounts(first: 100, after: $cursor) {
          pageInfo {
            hasNextPage
            endCursor
          }
          nodes {
            merchVariantUuid
            priceOverride
            countIn
            countOut
            comps
            merchAdds {
              quantity
            }
          }
        }
      }
    }
  }
}
";

// =============================================================================
// Variables
// =============================================================================

/// Variables for [`ACCOUNTS_QUERY`].
#[derive(Debug, Clone, Serialize)]
pub struct AccountsVariables {
    pub cursor: Option<String>,
}

/// Variables for [`TOURS_QUERY`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToursVariables {
    pub account_uuid: AccountId,
    pub cursor: Option<String>,
}

/// Variables for [`SHOWS_QUERY`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowsVariables {
    pub tour_uuid: TourId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cursor: Option<String>,
}

/// Variables for [`MERCHANDISE_QUERY`].
#[derive(Debug, Clone, Serialize)]
pub struct MerchandiseVariables {
    pub uuid: AccountId,
    pub cursor: Option<String>,
}

/// Variables for [`COUNTS_QUERY`].
#[derive(Debug, Clone, Serialize)]
pub struct CountsVariables {
    pub uuid: ShowId,
    pub cursor: Option<String>,
}
