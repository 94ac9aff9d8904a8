//! Progress and diagnostic events emitted during a sync.
//!
//! The pipeline never logs to a UI directly. It reports what it is doing to a
//! [`SyncObserver`]; front ends decide how to render it.

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;
use settlement_sync_core::{AccountId, DateRange, ShowId};

use crate::join::JoinMiss;

/// Something that happened during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A sync began.
    Started { range: DateRange },
    /// The organization's accounts were fetched.
    AccountsFetched { count: usize },
    /// An account's tours were fetched.
    ToursFetched { account: String, count: usize },
    /// A tour's shows in range were fetched.
    ShowsFetched { account: String, tour: String, count: usize },
    /// The server returned a show outside the requested window; it was dropped.
    ShowOutsideRange { show_id: ShowId, date: NaiveDate },
    /// Counts for a show are about to be processed.
    ProcessingShow { show_id: ShowId, date: NaiveDate },
    /// An account's merchandise catalog was fetched.
    MerchandiseFetched { account_id: AccountId, items: usize },
    /// An account's merchandise catalog was reused from this sync.
    MerchandiseCacheHit { account_id: AccountId },
    /// A show's settlement counts were fetched.
    CountsFetched { show_id: ShowId, count: usize },
    /// A show had more than one settlement; only the first was read.
    ExtraSettlementsIgnored { show_id: ShowId, settlements: usize },
    /// A count referenced a variant missing from the catalog; it was skipped.
    JoinMiss(JoinMiss),
    /// The sync finished.
    Finished {
        records: usize,
        join_misses: usize,
        shows: usize,
        requests: u64,
    },
}

/// Receives sync events.
pub trait SyncObserver: Send + Sync {
    /// Called for each event, in order.
    fn on_event(&self, event: &SyncEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SyncObserver for NoopObserver {
    fn on_event(&self, _event: &SyncEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn on_event(&self, event: &SyncEvent) {
        match event {
            SyncEvent::Started { range } => {
                tracing::info!(%range, "Fetching all data");
            }
            SyncEvent::AccountsFetched { count } => {
                tracing::info!(count, "Fetched accounts");
            }
            SyncEvent::ToursFetched { account, count } => {
                tracing::info!(%account, count, "Fetched tours");
            }
            SyncEvent::ShowsFetched {
                account,
                tour,
                count,
            } => {
                tracing::info!(%account, %tour, count, "Fetched shows");
            }
            SyncEvent::ShowOutsideRange { show_id, date } => {
                tracing::debug!(%show_id, %date, "Dropping show outside requested range");
            }
            SyncEvent::ProcessingShow { show_id, date } => {
                tracing::info!(%show_id, %date, "Processing show");
            }
            SyncEvent::MerchandiseFetched { account_id, items } => {
                tracing::info!(%account_id, items, "Fetched merchandise");
            }
            SyncEvent::MerchandiseCacheHit { account_id } => {
                tracing::debug!(%account_id, "Reusing merchandise catalog");
            }
            SyncEvent::CountsFetched { show_id, count } => {
                tracing::info!(%show_id, count, "Fetched counts");
            }
            SyncEvent::ExtraSettlementsIgnored {
                show_id,
                settlements,
            } => {
                tracing::warn!(%show_id, settlements, "Only the first settlement was counted");
            }
            SyncEvent::JoinMiss(miss) => {
                tracing::warn!(
                    show_id = %miss.show_id,
                    account_id = %miss.account_id,
                    variant_id = ?miss.variant_id,
                    "Count has no matching merchandise variant; skipped"
                );
            }
            SyncEvent::Finished {
                records,
                join_misses,
                shows,
                requests,
            } => {
                tracing::info!(records, join_misses, shows, requests, "Fetched total data points");
            }
        }
    }
}

/// Keeps every event in memory.
///
/// Useful for tests and for front ends that render the log after the fact.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl SyncObserver for RecordingObserver {
    fn on_event(&self, event: &SyncEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
