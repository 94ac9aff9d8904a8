//! End-to-end sync against the fake AtVenu server.

use rust_decimal::Decimal;
use serde_json::Value;
use settlement_sync::export::adjustments_to_string;
use settlement_sync::{
    DateRange, NoopObserver, RecordingObserver, SyncEvent, UnitPrice, fetch_data, fetch_sold_records,
};
use settlement_sync_core::{MerchVariantId, ShowId};
use settlement_sync_integration_tests::{
    FakeAtVenu, FakeReply, RecordedRequest, TEST_API_KEY, account, accounts_data, band_x_counts,
    band_x_world, connection, count, counts_data, logo_tee, merchandise_data, show, shows_data,
    tour, tours_data, uuid,
};
use uuid::Uuid;

fn june_first() -> DateRange {
    DateRange::parse("2024-06-01", "2024-06-01").expect("valid range")
}

async fn start(
    responder: impl Fn(&RecordedRequest) -> FakeReply + Send + Sync + 'static,
) -> FakeAtVenu {
    FakeAtVenu::start(responder)
        .await
        .expect("Failed to start fake AtVenu")
}

#[tokio::test]
async fn test_single_show_produces_adjustment_rows() {
    let fake = start(band_x_world(vec![show(3, "2024-06-01")])).await;
    let client = fake.client();

    let report = fetch_sold_records(&client, june_first(), &NoopObserver)
        .await
        .expect("sync should succeed");

    assert_eq!(report.records.len(), 2);
    assert!(report.join_misses.is_empty());
    assert_eq!(report.shows_processed, 1);

    let tee = &report.records[0];
    assert_eq!(tee.band_name, "BandX");
    assert_eq!(tee.tour_name, "TourY");
    assert_eq!(tee.venue_description, "Austin, TX, US");
    assert_eq!(tee.sku.as_deref(), Some("A1"));
    assert_eq!(tee.sold_quantity, 8);
    assert_eq!(tee.unit_price, UnitPrice::Catalog(Decimal::new(3000, 2)));

    let unpriced = &report.records[1];
    assert_eq!(unpriced.sku.as_deref(), Some("B2"));
    assert_eq!(unpriced.sold_quantity, 5);
    assert_eq!(unpriced.unit_price, UnitPrice::NotAvailable);

    let csv = adjustments_to_string(&report.records).expect("CSV renders");
    assert_eq!(
        csv,
        "SKU,Action,Quantity,Location,Reason\n\
         A1,Replace,-8,BandX - TourY,Nightly Sales\n\
         B2,Replace,-5,BandX - TourY,Nightly Sales\n"
    );
}

#[tokio::test]
async fn test_request_budget_for_one_show() {
    let fake = start(band_x_world(vec![show(3, "2024-06-01")])).await;
    let client = fake.client();

    let report = fetch_sold_records(&client, june_first(), &NoopObserver)
        .await
        .expect("sync should succeed");

    for operation in ["accounts", "tours", "shows", "merchandise", "counts"] {
        assert_eq!(fake.count(operation), 1, "{operation} requests");
    }
    assert_eq!(report.requests, 5);
    assert_eq!(client.request_count(), 5);
}

#[tokio::test]
async fn test_every_request_carries_api_key() {
    let fake = start(band_x_world(vec![show(3, "2024-06-01")])).await;

    fetch_sold_records(&fake.client(), june_first(), &NoopObserver)
        .await
        .expect("sync should succeed");

    let requests = fake.requests();
    assert!(!requests.is_empty());
    assert!(
        requests
            .iter()
            .all(|request| request.api_key.as_deref() == Some(TEST_API_KEY))
    );
}

#[tokio::test]
async fn test_shows_query_sends_tour_and_window() {
    let fake = start(band_x_world(vec![show(3, "2024-06-01")])).await;
    let range = DateRange::parse("2024-06-01", "2024-06-07").expect("valid range");

    fetch_sold_records(&fake.client(), range, &NoopObserver)
        .await
        .expect("sync should succeed");

    let shows = fake
        .requests()
        .into_iter()
        .find(|request| request.operation_name == "shows")
        .expect("shows was queried");
    assert_eq!(shows.var("tourUuid"), Some(uuid(2).as_str()));
    assert_eq!(shows.var("startDate"), Some("2024-06-01"));
    assert_eq!(shows.var("endDate"), Some("2024-06-07"));
    assert_eq!(shows.cursor(), None);
}

#[tokio::test]
async fn test_merchandise_fetched_once_per_account() {
    let fake = start(band_x_world(vec![
        show(3, "2024-06-01"),
        show(4, "2024-06-01"),
    ]))
    .await;
    let observer = RecordingObserver::new();

    let report = fetch_sold_records(&fake.client(), june_first(), &observer)
        .await
        .expect("sync should succeed");

    assert_eq!(fake.count("merchandise"), 1);
    assert_eq!(fake.count("counts"), 2);
    assert_eq!(report.records.len(), 4);
    assert_eq!(report.shows_processed, 2);
    assert!(
        observer
            .events()
            .iter()
            .any(|event| matches!(event, SyncEvent::MerchandiseCacheHit { .. }))
    );
}

#[tokio::test]
async fn test_records_follow_show_order() {
    let fake = start(band_x_world(vec![
        show(4, "2024-06-01"),
        show(3, "2024-06-01"),
    ]))
    .await;

    let report = fetch_sold_records(&fake.client(), june_first(), &NoopObserver)
        .await
        .expect("sync should succeed");

    let shows: Vec<ShowId> = report.records.iter().map(|record| record.show_id).collect();
    let fourth = ShowId::new(Uuid::from_u128(4));
    let third = ShowId::new(Uuid::from_u128(3));
    assert_eq!(shows, [fourth, fourth, third, third]);
}

#[tokio::test]
async fn test_accounts_walk_all_pages_in_order() {
    let fake = start(|request: &RecordedRequest| match request.operation_name.as_str() {
        "accounts" => match request.cursor() {
            None => FakeReply::Data(accounts_data(vec![account(1, "A")], Some("c1"))),
            Some("c1") => FakeReply::Data(accounts_data(vec![account(5, "B")], Some("c2"))),
            Some(_) => FakeReply::Data(accounts_data(vec![account(6, "C")], None)),
        },
        "tours" => FakeReply::Data(tours_data(Vec::new())),
        _ => FakeReply::Status(400, "unexpected operation"),
    })
    .await;
    let client = fake.client();

    let accounts = client.fetch_accounts().await.expect("accounts fetched");
    let names: Vec<_> = accounts.iter().map(|a| a.display_name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);

    let cursors: Vec<Option<String>> = fake
        .requests()
        .iter()
        .map(|request| request.cursor().map(str::to_string))
        .collect();
    assert_eq!(
        cursors,
        [None, Some("c1".to_string()), Some("c2".to_string())]
    );

    let report = fetch_sold_records(&client, june_first(), &NoopObserver)
        .await
        .expect("sync should succeed");
    assert!(report.records.is_empty());
    assert_eq!(fake.count("accounts"), 6);
    assert_eq!(fake.count("tours"), 3);
    assert_eq!(report.requests, 6);
}

#[tokio::test]
async fn test_counts_span_pages() {
    let fake = start(|request: &RecordedRequest| match request.operation_name.as_str() {
        "accounts" => FakeReply::Data(accounts_data(vec![account(1, "BandX")], None)),
        "tours" => FakeReply::Data(tours_data(vec![tour(2, "TourY")])),
        "shows" => FakeReply::Data(shows_data(vec![show(3, "2024-06-01")])),
        "merchandise" => FakeReply::Data(merchandise_data(1, vec![logo_tee()])),
        "counts" => match request.cursor() {
            None => FakeReply::Data(counts_data(vec![connection(
                vec![count(11, 10, 2, 0, &[])],
                Some("p2"),
            )])),
            Some(_) => FakeReply::Data(counts_data(vec![connection(
                vec![count(12, 5, 1, 1, &[2])],
                None,
            )])),
        },
        _ => FakeReply::Status(400, "unexpected operation"),
    })
    .await;

    let report = fetch_sold_records(&fake.client(), june_first(), &NoopObserver)
        .await
        .expect("sync should succeed");

    assert_eq!(fake.count("counts"), 2);
    let skus: Vec<_> = report
        .records
        .iter()
        .map(|record| record.sku.as_deref())
        .collect();
    assert_eq!(skus, [Some("A1"), Some("B2")]);
}

#[tokio::test]
async fn test_only_first_settlement_is_counted() {
    let fake = start(|request: &RecordedRequest| match request.operation_name.as_str() {
        "counts" => FakeReply::Data(counts_data(vec![
            connection(band_x_counts(), None),
            connection(vec![count(11, 500, 0, 0, &[])], None),
        ])),
        _ => band_x_world(vec![show(3, "2024-06-01")])(request),
    })
    .await;
    let observer = RecordingObserver::new();

    let report = fetch_sold_records(&fake.client(), june_first(), &observer)
        .await
        .expect("sync should succeed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].sold_quantity, 8);
    assert!(observer.events().contains(&SyncEvent::ExtraSettlementsIgnored {
        show_id: ShowId::new(Uuid::from_u128(3)),
        settlements: 2,
    }));
}

#[tokio::test]
async fn test_show_without_settlements_yields_nothing() {
    let fake = start(|request: &RecordedRequest| match request.operation_name.as_str() {
        "counts" => FakeReply::Data(counts_data(Vec::new())),
        _ => band_x_world(vec![show(3, "2024-06-01")])(request),
    })
    .await;

    let report = fetch_sold_records(&fake.client(), june_first(), &NoopObserver)
        .await
        .expect("sync should succeed");

    assert!(report.records.is_empty());
    assert_eq!(report.shows_processed, 1);
}

#[tokio::test]
async fn test_unknown_variant_is_skipped_and_reported() {
    let fake = start(|request: &RecordedRequest| match request.operation_name.as_str() {
        "counts" => {
            let mut counts = band_x_counts();
            counts.push(count(99, 3, 0, 0, &[]));
            FakeReply::Data(counts_data(vec![connection(counts, None)]))
        }
        _ => band_x_world(vec![show(3, "2024-06-01")])(request),
    })
    .await;
    let observer = RecordingObserver::new();

    let report = fetch_sold_records(&fake.client(), june_first(), &observer)
        .await
        .expect("an unmatched count is not an error");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.join_misses.len(), 1);
    assert_eq!(
        report.join_misses[0].variant_id,
        Some(MerchVariantId::new(Uuid::from_u128(99)))
    );
    assert!(
        observer
            .events()
            .iter()
            .any(|event| matches!(event, SyncEvent::JoinMiss(_)))
    );
}

#[tokio::test]
async fn test_show_outside_range_is_dropped() {
    let fake = start(band_x_world(vec![
        show(3, "2024-06-01"),
        show(4, "2024-05-01"),
    ]))
    .await;
    let observer = RecordingObserver::new();

    let report = fetch_sold_records(&fake.client(), june_first(), &observer)
        .await
        .expect("sync should succeed");

    assert_eq!(report.shows_processed, 1);
    assert_eq!(fake.count("counts"), 1);
    assert!(
        observer
            .events()
            .iter()
            .any(|event| matches!(event, SyncEvent::ShowOutsideRange { .. }))
    );
}

#[tokio::test]
async fn test_no_shows_means_no_merchandise_or_counts() {
    let fake = start(band_x_world(Vec::new())).await;

    let records = fetch_data(&fake.config(), june_first())
        .await
        .expect("sync should succeed");

    assert!(records.is_empty());
    assert_eq!(fake.count("merchandise"), 0);
    assert_eq!(fake.count("counts"), 0);
}

#[tokio::test]
async fn test_events_bracket_the_sync() {
    let fake = start(band_x_world(vec![show(3, "2024-06-01")])).await;
    let observer = RecordingObserver::new();

    fetch_sold_records(&fake.client(), june_first(), &observer)
        .await
        .expect("sync should succeed");

    let events = observer.events();
    assert_eq!(
        events.first(),
        Some(&SyncEvent::Started {
            range: june_first()
        })
    );
    assert_eq!(
        events.last(),
        Some(&SyncEvent::Finished {
            records: 2,
            join_misses: 0,
            shows: 1,
            requests: 5,
        })
    );
    let serialized = serde_json::to_value(&events).expect("events serialize");
    assert!(matches!(serialized, Value::Array(ref items) if items.len() == events.len()));
}
