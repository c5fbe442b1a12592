//! # Data Query Interface
//!
//! The listing never talks to a concrete backend. It describes what it wants as a
//! [`DataQuery`] and hands it to a [`DataSource`].
//!
//! ## Implementations
//!
//! - [`memory::InMemoryCatalog`] - joins in-process tables; used by the demo and the
//!   integration tests.
//! - [`mock::MockSource`] - scripted responses for tests, including answering
//!   queries out of order.

pub mod error;
pub mod memory;
pub mod mock;

pub use error::BackendError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The collections the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Article/manufacturer links, joined with their article, category and manufacturer.
    Products,
    Manufacturers,
    Categories,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collection::Products => "products",
            Collection::Manufacturers => "manufacturers",
            Collection::Categories => "categories",
        })
    }
}

/// A single row filter. Fields are dotted paths (`article.category_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Case-insensitive substring match. The needle is literal text.
    Contains { field: String, needle: String },
    Equals { field: String, value: i64 },
    In { field: String, values: Vec<i64> },
}

impl Predicate {
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: i64) -> Self {
        Predicate::Equals {
            field: field.into(),
            value,
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<i64>) -> Self {
        Predicate::In {
            field: field.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub ascending: bool,
}

/// Inclusive row window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub from: u64,
    pub to: u64,
}

/// One request against a [`Collection`]. All filters are ANDed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuery {
    pub collection: Collection,
    pub columns: Vec<String>,
    pub filters: Vec<Predicate>,
    pub order: Option<OrderBy>,
    pub range: Option<RowRange>,
}

impl DataQuery {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            range: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some(RowRange { from, to });
        self
    }
}

/// Rows for the requested window plus the exact count of all matching rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub rows: Vec<serde_json::Value>,
    pub total_matching: u64,
}

/// The backend the listing reads from.
///
/// # Contract
/// `total_matching` counts every row that passes the filters, independent of
/// `range`. Product rows are inner joins: a product whose article, category or
/// manufacturer is missing is not returned at all.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    async fn query(&self, query: DataQuery) -> Result<QueryPage, BackendError>;
}
