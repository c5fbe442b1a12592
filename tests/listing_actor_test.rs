use catalog_listing::clients::ListingClient;
use catalog_listing::config::ListingConfig;
use catalog_listing::listing_actor::{IntentOutcome, ListingContext};
use catalog_listing::model::{SortDirection, SortKey};
use catalog_listing::presentation::ListingView;
use catalog_listing::session::{session_channel, RecordingNavigator, SessionSignal};
use catalog_listing::source::mock::{create_mock_source, expect_query_on, PendingQuery};
use catalog_listing::source::{BackendError, Collection, Predicate, QueryPage};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Real listing actor over a hand-answered mock source.
///
/// Every product query stays open until the test answers it, so completions
/// can be delivered in any order.
struct Harness {
    client: ListingClient,
    queries: mpsc::Receiver<PendingQuery>,
    session: watch::Sender<SessionSignal>,
    navigator: RecordingNavigator,
    handle: JoinHandle<()>,
}

fn start(initial: SessionSignal) -> Harness {
    let (source, queries) = create_mock_source(16);
    let (session, session_rx) = session_channel(initial);
    let navigator = RecordingNavigator::new();

    let (actor, client) = catalog_listing::listing_actor::new(&ListingConfig::default());
    let handle = tokio::spawn(actor.run(ListingContext {
        source: Arc::new(source),
        session: session_rx,
        navigator: Arc::new(navigator.clone()),
    }));

    Harness {
        client,
        queries,
        session,
        navigator,
        handle,
    }
}

fn row(id: i64, reference: &str) -> Value {
    json!({
        "id": id,
        "reference": reference,
        "certified_by_authority": false,
        "article": { "name": "Smart meter", "category": { "name": "Meters" } },
        "manufacturer": { "name": "Acme" },
    })
}

fn page(references: &[&str], total: u64) -> Result<QueryPage, BackendError> {
    Ok(QueryPage {
        rows: references
            .iter()
            .zip(1..)
            .map(|(reference, id)| row(id, reference))
            .collect(),
        total_matching: total,
    })
}

async fn next_products_query(harness: &mut Harness) -> PendingQuery {
    expect_query_on(&mut harness.queries, Collection::Products)
        .await
        .expect("Expected a products query")
}

fn has_reference_needle(pending: &PendingQuery, needle: &str) -> bool {
    pending
        .query
        .filters
        .contains(&Predicate::contains("reference", needle))
}

/// Answers the fetch issued on mount and waits for it to commit.
async fn mount(harness: &mut Harness, total: u64) {
    next_products_query(harness)
        .await
        .respond(page(&["AA-1", "AA-2"], total));
    let state = harness.client.settled().await.unwrap();
    assert_eq!(state.total_count, total);
}

async fn stop(harness: Harness) {
    drop(harness.client);
    harness.handle.await.unwrap();
}

#[tokio::test]
async fn test_newer_answer_first_then_stale_is_dropped() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 2).await;

    assert_eq!(
        harness.client.set_reference_filter("A").await.unwrap(),
        IntentOutcome::Fetching { seq: 2 }
    );
    assert_eq!(
        harness.client.set_reference_filter("AB").await.unwrap(),
        IntentOutcome::Fetching { seq: 3 }
    );

    let first = next_products_query(&mut harness).await;
    let second = next_products_query(&mut harness).await;
    let (older, newer) = if has_reference_needle(&first, "AB") {
        (second, first)
    } else {
        (first, second)
    };
    assert!(has_reference_needle(&older, "A"));

    newer.respond(page(&["AB-1"], 1));
    let state = harness.client.settled().await.unwrap();
    assert_eq!(state.items[0].reference, "AB-1");
    assert_eq!(state.total_count, 1);

    older.respond(page(&["A-1", "A-2", "A-3"], 3));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = harness.client.snapshot().await.unwrap();
    assert_eq!(state.filters.reference, "AB");
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].reference, "AB-1");
    assert_eq!(state.total_count, 1);

    stop(harness).await;
}

#[tokio::test]
async fn test_stale_answer_before_newer_does_not_commit() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 2).await;

    harness.client.set_reference_filter("A").await.unwrap();
    harness.client.set_reference_filter("AB").await.unwrap();

    let first = next_products_query(&mut harness).await;
    let second = next_products_query(&mut harness).await;
    let (older, newer) = if has_reference_needle(&first, "AB") {
        (second, first)
    } else {
        (first, second)
    };

    older.respond(page(&["A-1", "A-2", "A-3"], 3));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let state = harness.client.snapshot().await.unwrap();
    assert!(state.loading, "Stale completion must not end the newer fetch");
    assert_eq!(state.total_count, 2);

    newer.respond(page(&["AB-1"], 1));
    let state = harness.client.settled().await.unwrap();
    assert_eq!(state.items[0].reference, "AB-1");
    assert_eq!(state.total_count, 1);

    stop(harness).await;
}

#[tokio::test]
async fn test_filter_and_sort_changes_reset_page() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 42).await;

    harness.client.set_page(3).await.unwrap();
    next_products_query(&mut harness)
        .await
        .respond(page(&["AA-21"], 42));
    assert_eq!(harness.client.settled().await.unwrap().page, 3);

    harness.client.set_category_filter(Some(7)).await.unwrap();
    let pending = next_products_query(&mut harness).await;
    assert!(pending
        .query
        .filters
        .contains(&Predicate::equals("article.category_id", 7)));
    assert_eq!(pending.query.range.map(|r| (r.from, r.to)), Some((0, 9)));
    pending.respond(page(&["AA-1"], 42));
    assert_eq!(harness.client.settled().await.unwrap().page, 1);

    harness.client.set_sort(SortKey::Reference).await.unwrap();
    next_products_query(&mut harness)
        .await
        .respond(page(&["AA-1"], 42));
    harness.client.set_sort(SortKey::Reference).await.unwrap();
    let pending = next_products_query(&mut harness).await;
    let order = pending.query.order.clone().expect("Expected an order");
    assert_eq!(order.field, "reference");
    assert!(!order.ascending);
    pending.respond(page(&["ZZ-9"], 42));

    let state = harness.client.settled().await.unwrap();
    assert_eq!(state.sort.key, SortKey::Reference);
    assert_eq!(state.sort.direction, SortDirection::Desc);
    assert_eq!(state.page, 1);

    stop(harness).await;
}

#[tokio::test]
async fn test_out_of_range_page_is_ignored() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 42).await;

    assert_eq!(harness.client.set_page(0).await.unwrap(), IntentOutcome::Ignored);
    assert_eq!(harness.client.set_page(6).await.unwrap(), IntentOutcome::Ignored);
    assert_eq!(
        harness.client.set_page(5).await.unwrap(),
        IntentOutcome::Fetching { seq: 2 }
    );

    let pending = next_products_query(&mut harness).await;
    assert_eq!(pending.query.range.map(|r| (r.from, r.to)), Some((40, 49)));
    pending.respond(page(&["AA-41", "AA-42"], 42));

    let state = harness.client.settled().await.unwrap();
    assert_eq!(state.page, 5);
    assert_eq!(state.total_pages(), 5);

    stop(harness).await;
}

#[tokio::test]
async fn test_failure_keeps_rows_and_next_cycle_clears_error() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 2).await;

    harness.client.set_reference_filter("AB").await.unwrap();
    next_products_query(&mut harness)
        .await
        .respond(Err(BackendError::unavailable("Backend down")));

    let state = harness.client.settled().await.unwrap();
    assert!(!state.loading);
    assert!(state.last_error.as_deref().unwrap().contains("Backend down"));
    assert_eq!(state.items.len(), 2, "Previous rows stay visible");
    assert_eq!(state.total_count, 2);

    // Retry by refreshing with the same filters.
    harness.client.refresh().await.unwrap();
    assert_eq!(harness.client.state().last_error, None);
    next_products_query(&mut harness)
        .await
        .respond(page(&["AB-1"], 1));

    let state = harness.client.settled().await.unwrap();
    assert_eq!(state.last_error, None);
    assert_eq!(state.total_count, 1);

    stop(harness).await;
}

#[tokio::test]
async fn test_pending_session_defers_until_present() {
    let mut harness = start(SessionSignal::Pending);

    assert_eq!(
        harness.client.set_reference_filter("AB").await.unwrap(),
        IntentOutcome::Deferred
    );
    let state = harness.client.snapshot().await.unwrap();
    assert!(!state.loading);
    assert_eq!(state.filters.reference, "AB");
    assert_eq!(ListingView::from_state(&state), ListingView::Loading);
    assert!(harness.queries.try_recv().is_err(), "No query before the session");

    harness.session.send(SessionSignal::Present).unwrap();
    let pending = next_products_query(&mut harness).await;
    assert!(has_reference_needle(&pending, "AB"));
    pending.respond(page(&["AB-1"], 1));

    let mut state = harness.client.subscribe();
    let total = state
        .wait_for(|s| s.session == SessionSignal::Present && !s.loading)
        .await
        .unwrap()
        .total_count;
    assert_eq!(total, 1);
    assert_eq!(harness.navigator.redirects(), 0);

    stop(harness).await;
}

#[tokio::test]
async fn test_absent_session_redirects_once_and_reloads_after_login() {
    let mut harness = start(SessionSignal::Pending);

    harness.session.send(SessionSignal::Absent).unwrap();
    let mut state = harness.client.subscribe();
    state
        .wait_for(|s| s.session == SessionSignal::Absent)
        .await
        .unwrap();
    assert_eq!(harness.navigator.redirects(), 1);

    assert_eq!(harness.client.set_page(1).await.unwrap(), IntentOutcome::Deferred);
    assert_eq!(harness.navigator.redirects(), 1);

    harness.session.send(SessionSignal::Present).unwrap();
    next_products_query(&mut harness)
        .await
        .respond(page(&["AA-1"], 1));
    state
        .wait_for(|s| s.session == SessionSignal::Present && !s.loading)
        .await
        .unwrap();
    assert_eq!(harness.client.state().total_count, 1);

    stop(harness).await;
}

#[tokio::test]
async fn test_page_chosen_during_filter_fetch_is_pulled_back_into_range() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 42).await;

    harness.client.set_reference_filter("ZZ").await.unwrap();
    // Still judged against the old total of 42.
    assert_eq!(
        harness.client.set_page(5).await.unwrap(),
        IntentOutcome::Fetching { seq: 3 }
    );

    let first = next_products_query(&mut harness).await;
    let second = next_products_query(&mut harness).await;
    let (filter_fetch, page_fetch) = if second.query.range.map(|r| r.from) == Some(40) {
        (first, second)
    } else {
        (second, first)
    };
    assert_eq!(page_fetch.query.range.map(|r| (r.from, r.to)), Some((40, 49)));

    page_fetch.respond(page(&[], 3));
    let refetch = next_products_query(&mut harness).await;
    assert_eq!(refetch.query.range.map(|r| (r.from, r.to)), Some((0, 9)));
    assert!(has_reference_needle(&refetch, "ZZ"));
    filter_fetch.respond(page(&["ZZ-9"], 1));
    refetch.respond(page(&["ZZ-1", "ZZ-2", "ZZ-3"], 3));

    let state = harness.client.settled().await.unwrap();
    assert_eq!(state.page, 1);
    assert!(state.page <= state.total_pages());
    assert_eq!(state.total_count, 3);
    assert_eq!(state.items.len(), 3);

    stop(harness).await;
}

#[tokio::test]
async fn test_fetch_in_flight_is_dropped_when_intent_is_deferred() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 2).await;

    harness.client.set_reference_filter("A").await.unwrap();
    let in_flight = next_products_query(&mut harness).await;

    harness.session.send(SessionSignal::Absent).unwrap();
    let mut state = harness.client.subscribe();
    state
        .wait_for(|s| s.session == SessionSignal::Absent)
        .await
        .unwrap();

    assert_eq!(
        harness.client.set_reference_filter("B").await.unwrap(),
        IntentOutcome::Deferred
    );
    in_flight.respond(page(&["A-1", "A-2", "A-3"], 3));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let snapshot = harness.client.snapshot().await.unwrap();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.filters.reference, "B");
    assert_eq!(snapshot.total_count, 2, "Rows for the old filter never commit");

    harness.session.send(SessionSignal::Present).unwrap();
    let reload = next_products_query(&mut harness).await;
    assert!(has_reference_needle(&reload, "B"));
    reload.respond(page(&["B-1"], 1));
    state
        .wait_for(|s| s.session == SessionSignal::Present && !s.loading)
        .await
        .unwrap();
    assert_eq!(harness.client.state().total_count, 1);

    stop(harness).await;
}

#[tokio::test]
async fn test_unmatched_manufacturer_name_skips_products_query() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 2).await;

    harness
        .client
        .set_manufacturer_name_filter("nobody")
        .await
        .unwrap();
    let lookup = expect_query_on(&mut harness.queries, Collection::Manufacturers)
        .await
        .expect("Expected a manufacturer lookup");
    assert!(lookup
        .query
        .filters
        .contains(&Predicate::contains("name", "nobody")));
    lookup.respond(Ok(QueryPage::default()));

    let state = harness.client.settled().await.unwrap();
    assert!(state.items.is_empty());
    assert_eq!(state.total_count, 0);
    assert_eq!(state.last_error, None);
    assert!(harness.queries.try_recv().is_err(), "No products query expected");

    stop(harness).await;
}

#[tokio::test]
async fn test_shutdown_when_client_dropped() {
    let mut harness = start(SessionSignal::Present);
    mount(&mut harness, 2).await;

    let subscriber = harness.client.subscribe();
    stop(harness).await;
    assert!(subscriber.has_changed().is_err(), "State channel closes with the actor");
}
