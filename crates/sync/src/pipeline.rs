//! End-to-end sync: hierarchy walk, count collection and join.
//!
//! Strictly sequential. Every request is awaited before the next is sent, and
//! the first transport or query error aborts the whole sync.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Instant;

use settlement_sync_core::{AccountId, DateRange, SoldRecord};
use tracing::instrument;

use crate::atvenu::{AtVenuClient, AtVenuError, MerchCatalog, Show};
use crate::config::AtVenuConfig;
use crate::events::{SyncEvent, SyncObserver, TracingObserver};
use crate::join::{JoinMiss, join_show_counts};

/// Everything a sync produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Sold records, in show fetch order then count order.
    pub records: Vec<SoldRecord>,
    /// Counts skipped because their variant was not in the catalog.
    pub join_misses: Vec<JoinMiss>,
    /// Shows whose counts were processed.
    pub shows_processed: usize,
    /// HTTP requests issued by this sync.
    pub requests: u64,
}

/// Fetch every show in `range`, annotated with its account and tour.
///
/// Walks all accounts, then each account's tours, then each tour's shows.
/// Shows are returned in that traversal order without deduplication. Any show
/// the server returns outside the window is dropped.
///
/// # Errors
///
/// Returns the first `AtVenuError` from any request.
#[instrument(skip(client, range, observer), fields(range = %range))]
pub async fn fetch_shows_in_range(
    client: &AtVenuClient,
    range: DateRange,
    observer: &dyn SyncObserver,
) -> Result<Vec<Show>, AtVenuError> {
    let mut shows = Vec::new();

    let accounts = client.fetch_accounts().await?;
    observer.on_event(&SyncEvent::AccountsFetched {
        count: accounts.len(),
    });

    for account in &accounts {
        let tours = client.fetch_tours(account.id).await?;
        observer.on_event(&SyncEvent::ToursFetched {
            account: account.display_name.clone(),
            count: tours.len(),
        });

        for tour in &tours {
            let nodes = client.fetch_shows(tour.id, range).await?;
            observer.on_event(&SyncEvent::ShowsFetched {
                account: account.display_name.clone(),
                tour: tour.name.clone(),
                count: nodes.len(),
            });

            for node in nodes {
                if !range.overlaps(node.show_date, node.show_end_date) {
                    observer.on_event(&SyncEvent::ShowOutsideRange {
                        show_id: node.uuid,
                        date: node.show_date,
                    });
                    continue;
                }
                shows.push(node.into_show(account, tour));
            }
        }
    }

    Ok(shows)
}

/// Run a full sync and return sold records plus diagnostics.
///
/// Merchandise is fetched at most once per account, on the first show that
/// needs it.
///
/// # Errors
///
/// Returns the first `AtVenuError` from any request; no partial report.
#[instrument(skip(client, range, observer), fields(range = %range))]
pub async fn fetch_sold_records(
    client: &AtVenuClient,
    range: DateRange,
    observer: &dyn SyncObserver,
) -> Result<SyncReport, AtVenuError> {
    let started = Instant::now();
    let requests_before = client.request_count();
    observer.on_event(&SyncEvent::Started { range });

    let shows = fetch_shows_in_range(client, range, observer).await?;
    let mut catalogs: HashMap<AccountId, MerchCatalog> = HashMap::new();
    let mut report = SyncReport::default();

    for show in &shows {
        observer.on_event(&SyncEvent::ProcessingShow {
            show_id: show.id,
            date: show.date,
        });

        let catalog = match catalogs.entry(show.account.id) {
            Entry::Occupied(entry) => {
                observer.on_event(&SyncEvent::MerchandiseCacheHit {
                    account_id: show.account.id,
                });
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let catalog = client.fetch_merchandise(show.account.id).await?;
                observer.on_event(&SyncEvent::MerchandiseFetched {
                    account_id: show.account.id,
                    items: catalog.item_count(),
                });
                entry.insert(catalog)
            }
        };

        let counts = client.fetch_counts(show.id).await?;
        observer.on_event(&SyncEvent::CountsFetched {
            show_id: show.id,
            count: counts.counts.len(),
        });
        if counts.ignored_settlements() > 0 {
            observer.on_event(&SyncEvent::ExtraSettlementsIgnored {
                show_id: show.id,
                settlements: counts.settlements,
            });
        }

        let outcome = join_show_counts(show, &counts.counts, catalog);
        for miss in &outcome.misses {
            observer.on_event(&SyncEvent::JoinMiss(miss.clone()));
        }
        report.records.extend(outcome.records);
        report.join_misses.extend(outcome.misses);
        report.shows_processed += 1;
    }

    report.requests = client.request_count().saturating_sub(requests_before);
    observer.on_event(&SyncEvent::Finished {
        records: report.records.len(),
        join_misses: report.join_misses.len(),
        shows: report.shows_processed,
        requests: report.requests,
    });
    tracing::info!(
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Sync complete"
    );

    Ok(report)
}

/// Fetch sold records for `range` with the given credentials.
///
/// Builds a client, logs progress through `tracing` and returns just the
/// records.
///
/// # Errors
///
/// Returns the first `AtVenuError` from any request.
pub async fn fetch_data(
    config: &AtVenuConfig,
    range: DateRange,
) -> Result<Vec<SoldRecord>, AtVenuError> {
    let client = AtVenuClient::new(config);
    let report = fetch_sold_records(&client, range, &TracingObserver).await?;
    Ok(report.records)
}
