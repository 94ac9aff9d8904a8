//! Cached sync results.
//!
//! Repeated requests for the same window within 5 minutes are served from
//! memory via `moka` instead of walking the API again.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use settlement_sync_core::DateRange;
use tracing::{debug, instrument};

use crate::atvenu::{AtVenuClient, AtVenuError};
use crate::events::SyncObserver;
use crate::pipeline::{SyncReport, fetch_sold_records};

/// Default time a report stays cached.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// A sync front that memoizes reports per date range.
#[derive(Clone)]
pub struct CachedSync {
    inner: Arc<CachedSyncInner>,
}

struct CachedSyncInner {
    client: AtVenuClient,
    observer: Arc<dyn SyncObserver>,
    reports: Cache<DateRange, Arc<SyncReport>>,
}

impl CachedSync {
    /// Wrap `client`, caching reports for [`DEFAULT_TTL`].
    #[must_use]
    pub fn new(client: AtVenuClient, observer: Arc<dyn SyncObserver>) -> Self {
        Self::with_ttl(client, observer, DEFAULT_TTL)
    }

    /// Wrap `client`, caching reports for `ttl`.
    #[must_use]
    pub fn with_ttl(client: AtVenuClient, observer: Arc<dyn SyncObserver>, ttl: Duration) -> Self {
        let reports = Cache::builder().max_capacity(64).time_to_live(ttl).build();
        Self {
            inner: Arc::new(CachedSyncInner {
                client,
                observer,
                reports,
            }),
        }
    }

    /// The sync report for `range`, fetched on a miss.
    ///
    /// Failed syncs are not cached.
    ///
    /// # Errors
    ///
    /// Returns the first `AtVenuError` of a sync run on a cache miss.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn report(&self, range: DateRange) -> Result<Arc<SyncReport>, AtVenuError> {
        if let Some(report) = self.inner.reports.get(&range).await {
            debug!("Cache hit for sync report");
            return Ok(report);
        }

        let report = Arc::new(
            fetch_sold_records(&self.inner.client, range, self.inner.observer.as_ref()).await?,
        );
        self.inner.reports.insert(range, Arc::clone(&report)).await;
        Ok(report)
    }

    /// Drop the cached report for `range`.
    pub async fn invalidate(&self, range: DateRange) {
        self.inner.reports.invalidate(&range).await;
    }

    /// Drop every cached report.
    pub async fn invalidate_all(&self) {
        self.inner.reports.invalidate_all();
        self.inner.reports.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for CachedSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSync")
            .field("client", &self.inner.client)
            .field("cached_reports", &self.inner.reports.entry_count())
            .finish_non_exhaustive()
    }
}
