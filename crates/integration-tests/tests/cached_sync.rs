//! Date-range memoization of sync reports.

use std::sync::Arc;

use settlement_sync::{CachedSync, DateRange, NoopObserver, SyncObserver};
use settlement_sync_integration_tests::{FakeAtVenu, band_x_world, show};

fn range(start: &str, end: &str) -> DateRange {
    DateRange::parse(start, end).expect("valid range")
}

async fn cached() -> (FakeAtVenu, CachedSync) {
    let fake = FakeAtVenu::start(band_x_world(vec![show(3, "2024-06-01")]))
        .await
        .expect("Failed to start fake AtVenu");
    let observer: Arc<dyn SyncObserver> = Arc::new(NoopObserver);
    let sync = CachedSync::new(fake.client(), observer);
    (fake, sync)
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let (fake, sync) = cached().await;
    let june = range("2024-06-01", "2024-06-01");

    let first = sync.report(june).await.expect("first sync");
    let issued = fake.requests().len();
    let second = sync.report(june).await.expect("cached sync");

    assert_eq!(first.records.len(), 2);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fake.requests().len(), issued);
}

#[tokio::test]
async fn test_different_range_is_a_miss() {
    let (fake, sync) = cached().await;

    sync.report(range("2024-06-01", "2024-06-01"))
        .await
        .expect("first sync");
    sync.report(range("2024-06-01", "2024-06-02"))
        .await
        .expect("second sync");

    assert_eq!(fake.count("accounts"), 2);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let (fake, sync) = cached().await;
    let june = range("2024-06-01", "2024-06-01");

    sync.report(june).await.expect("first sync");
    sync.invalidate(june).await;
    sync.report(june).await.expect("refetch");

    assert_eq!(fake.count("accounts"), 2);
}
