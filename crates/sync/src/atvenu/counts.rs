//! Settlement count collector.
//!
//! A show may carry several settlements. Only the first settlement's
//! `mainCounts` are collected; the others are ignored. The number of
//! settlements seen is returned so callers can report what was skipped.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;
use settlement_sync_core::ShowId;
use tracing::instrument;

use super::AtVenuError;
use super::client::AtVenuClient;
use super::pagination::{Connection, collect_pages};
use super::queries::{COUNTS_QUERY, CountsVariables};
use super::types::{CountRecord, null_as_empty};

#[derive(Debug, Deserialize)]
struct CountsData {
    show: Option<ShowSettlementsNode>,
}

#[derive(Debug, Deserialize)]
struct ShowSettlementsNode {
    #[serde(default, deserialize_with = "null_as_empty")]
    settlements: Vec<Settlement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Settlement {
    main_counts: Connection<CountRecord>,
}

/// Counts collected for one show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettlementCounts {
    /// Counts of the first settlement, in page order.
    pub counts: Vec<CountRecord>,
    /// Settlements the show reported (only the first is read).
    pub settlements: usize,
}

impl SettlementCounts {
    /// Settlements whose counts were not collected.
    #[must_use]
    pub const fn ignored_settlements(&self) -> usize {
        self.settlements.saturating_sub(1)
    }
}

impl AtVenuClient {
    /// Fetch the counts of a show's first settlement.
    ///
    /// A show with no settlements yields no counts.
    ///
    /// # Errors
    ///
    /// Returns `AtVenuError::NodeNotFound` if the show does not exist, or
    /// any error from a page request.
    #[instrument(skip(self, show_id), fields(show_id = %show_id))]
    pub async fn fetch_counts(&self, show_id: ShowId) -> Result<SettlementCounts, AtVenuError> {
        let settlements = AtomicUsize::new(0);
        let counts =
            collect_pages(|cursor| self.counts_page(show_id, cursor, &settlements)).await?;
        let settlements = settlements.into_inner();

        if settlements > 1 {
            tracing::warn!(
                settlements,
                "Show has multiple settlements; only the first is counted"
            );
        }
        tracing::debug!(counts = counts.len(), settlements, "Collected settlement counts");

        Ok(SettlementCounts {
            counts,
            settlements,
        })
    }

    async fn counts_page(
        &self,
        show_id: ShowId,
        cursor: Option<String>,
        settlements_seen: &AtomicUsize,
    ) -> Result<Connection<CountRecord>, AtVenuError> {
        let variables = CountsVariables {
            uuid: show_id,
            cursor,
        };
        let data: CountsData = self.execute("counts", COUNTS_QUERY, variables).await?;
        let show = data.show.ok_or_else(|| AtVenuError::NodeNotFound {
            kind: "Show",
            id: show_id.to_string(),
        })?;

        settlements_seen.fetch_max(show.settlements.len(), Ordering::Relaxed);
        Ok(first_settlement_counts(show.settlements))
    }
}

/// The `mainCounts` page of the first settlement, or an empty terminal page.
fn first_settlement_counts(settlements: Vec<Settlement>) -> Connection<CountRecord> {
    settlements
        .into_iter()
        .next()
        .map_or_else(Connection::empty, |settlement| settlement.main_counts)
}
