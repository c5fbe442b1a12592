//! # Mock Data Sources
//!
//! Utilities for testing the listing without a backend.
//!
//! | Type | Use Case |
//! |------|----------|
//! | [`ScriptedSource`] | Queue canned answers up front, then `verify()` they were all consumed |
//! | [`MockSource`] + [`create_mock_source`] | Hold every query open and answer it by hand, in any order |
//!
//! The second form is what makes out-of-order completions testable: issue two
//! fetches, receive both [`PendingQuery`]s, then answer the newer one first.

use super::{BackendError, Collection, DataQuery, DataSource, QueryPage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// A query waiting for the test to answer it.
#[derive(Debug)]
pub struct PendingQuery {
    pub query: DataQuery,
    pub respond_to: oneshot::Sender<Result<QueryPage, BackendError>>,
}

impl PendingQuery {
    pub fn respond(self, result: Result<QueryPage, BackendError>) {
        let _ = self.respond_to.send(result);
    }
}

/// A data source that forwards every query to a channel the test controls.
#[derive(Clone)]
pub struct MockSource {
    sender: mpsc::Sender<PendingQuery>,
}

#[async_trait]
impl DataSource for MockSource {
    async fn query(&self, query: DataQuery) -> Result<QueryPage, BackendError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PendingQuery { query, respond_to })
            .await
            .map_err(|_| BackendError::unavailable("Mock source closed"))?;
        response
            .await
            .map_err(|_| BackendError::unavailable("Mock dropped the query"))?
    }
}

/// Creates a mock source and the receiver its queries arrive on.
///
/// ```ignore
/// let (source, mut queries) = create_mock_source(10);
/// let pending = expect_query(&mut queries).await.expect("Expected a query");
/// pending.respond(Ok(QueryPage::default()));
/// ```
pub fn create_mock_source(buffer_size: usize) -> (MockSource, mpsc::Receiver<PendingQuery>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockSource { sender }, receiver)
}

/// Waits for the next query.
pub async fn expect_query(receiver: &mut mpsc::Receiver<PendingQuery>) -> Option<PendingQuery> {
    receiver.recv().await
}

/// Waits for the next query and checks it targets `collection`.
pub async fn expect_query_on(
    receiver: &mut mpsc::Receiver<PendingQuery>,
    collection: Collection,
) -> Option<PendingQuery> {
    receiver
        .recv()
        .await
        .filter(|pending| pending.query.collection == collection)
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Expectation {
    collection: Collection,
    response: Result<QueryPage, BackendError>,
}

/// A data source answering from a queue of expectations.
///
/// # Example
/// ```ignore
/// let source = ScriptedSource::new();
/// source.expect(Collection::Manufacturers).return_ok(QueryPage::default());
/// // ... run code under test ...
/// source.verify();
/// ```
#[derive(Clone, Default)]
pub struct ScriptedSource {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    received: Arc<Mutex<Vec<DataQuery>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a query on `collection`.
    pub fn expect(&self, collection: Collection) -> ExpectationBuilder {
        ExpectationBuilder {
            collection,
            expectations: self.expectations.clone(),
        }
    }

    /// Queries received so far.
    pub fn received(&self) -> Vec<DataQuery> {
        self.received.lock().unwrap().clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn query(&self, query: DataQuery) -> Result<QueryPage, BackendError> {
        let collection = query.collection;
        self.received.lock().unwrap().push(query);
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(exp) if exp.collection == collection => exp.response,
            Some(exp) => panic!(
                "Unexpected query on {collection}, expected {}",
                exp.collection
            ),
            None => panic!("Unexpected query on {collection}: no expectations left"),
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    collection: Collection,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    pub fn return_ok(self, page: QueryPage) {
        self.push(Ok(page));
    }

    pub fn return_err(self, error: BackendError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<QueryPage, BackendError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            collection: self.collection,
            response,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_source_round_trip() {
        let (source, mut queries) = create_mock_source(4);

        let task = tokio::spawn(async move {
            source.query(DataQuery::new(Collection::Categories)).await
        });

        let pending = expect_query_on(&mut queries, Collection::Categories)
            .await
            .expect("Expected a categories query");
        pending.respond(Ok(QueryPage {
            rows: vec![json!({ "id": 1, "name": "Meters" })],
            total_matching: 1,
        }));

        let page = task.await.unwrap().unwrap();
        assert_eq!(page.total_matching, 1);
    }

    #[tokio::test]
    async fn test_dropped_query_surfaces_as_backend_error() {
        let (source, mut queries) = create_mock_source(4);
        let task = tokio::spawn(async move {
            source.query(DataQuery::new(Collection::Products)).await
        });

        drop(expect_query(&mut queries).await);
        let err = task.await.unwrap().unwrap_err();
        assert_eq!(err.status, 503);
    }

    #[tokio::test]
    async fn test_scripted_source_with_expectations() {
        let source = ScriptedSource::new();
        source
            .expect(Collection::Manufacturers)
            .return_err(BackendError::new(401, "JWT expired"));

        let err = source
            .query(DataQuery::new(Collection::Manufacturers))
            .await
            .unwrap_err();
        assert_eq!(err.message, "JWT expired");
        assert_eq!(source.received().len(), 1);
        source.verify();
    }
}
