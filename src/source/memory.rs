//! An in-process [`DataSource`] over plain tables.
//!
//! Products are link rows between an article and a manufacturer. Queries on
//! [`Collection::Products`] inner-join the article, the article's category and
//! the manufacturer, then filter, count, order and window the joined rows.

use super::{BackendError, Collection, DataQuery, DataSource, OrderBy, Predicate, QueryPage};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// How joined entities are represented in product rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinShape {
    #[default]
    Object,
    /// Each joined entity wrapped in a single-element array.
    Collection,
}

#[derive(Debug, Clone)]
struct ArticleRow {
    name: String,
    category_id: i64,
}

#[derive(Debug, Clone)]
struct LinkRow {
    reference: String,
    certified_by_authority: bool,
    article_id: i64,
    manufacturer_id: i64,
}

/// In-memory catalog tables.
///
/// # Example
/// ```
/// use catalog_listing::source::memory::InMemoryCatalog;
///
/// let catalog = InMemoryCatalog::new()
///     .with_category(1, "Meters")
///     .with_manufacturer(10, "Acme")
///     .with_article(100, "Smart meter", 1)
///     .with_product(1, "AB-001", true, 100, 10);
/// assert_eq!(catalog.product_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    manufacturers: BTreeMap<i64, String>,
    categories: BTreeMap<i64, String>,
    articles: BTreeMap<i64, ArticleRow>,
    products: BTreeMap<i64, LinkRow>,
    shape: JoinShape,
    failure: Mutex<Option<BackendError>>,
    log: Mutex<Vec<DataQuery>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manufacturer(mut self, id: i64, name: impl Into<String>) -> Self {
        self.manufacturers.insert(id, name.into());
        self
    }

    pub fn with_category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.categories.insert(id, name.into());
        self
    }

    pub fn with_article(mut self, id: i64, name: impl Into<String>, category_id: i64) -> Self {
        self.articles.insert(
            id,
            ArticleRow {
                name: name.into(),
                category_id,
            },
        );
        self
    }

    pub fn with_product(
        mut self,
        id: i64,
        reference: impl Into<String>,
        certified_by_authority: bool,
        article_id: i64,
        manufacturer_id: i64,
    ) -> Self {
        self.products.insert(
            id,
            LinkRow {
                reference: reference.into(),
                certified_by_authority,
                article_id,
                manufacturer_id,
            },
        );
        self
    }

    pub fn with_join_shape(mut self, shape: JoinShape) -> Self {
        self.shape = shape;
        self
    }

    /// Makes every following query fail with `error`, or succeed again with `None`.
    pub fn set_failure(&self, error: Option<BackendError>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = error;
        }
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Every query received so far, in arrival order.
    pub fn queries(&self) -> Vec<DataQuery> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn queries_on(&self, collection: Collection) -> usize {
        self.queries()
            .iter()
            .filter(|q| q.collection == collection)
            .count()
    }

    fn named_rows(table: &BTreeMap<i64, String>) -> Vec<Value> {
        table
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect()
    }

    fn joined_products(&self) -> Vec<Value> {
        self.products
            .iter()
            .filter_map(|(id, link)| {
                let article = self.articles.get(&link.article_id)?;
                let category = self.categories.get(&article.category_id)?;
                let manufacturer = self.manufacturers.get(&link.manufacturer_id)?;
                Some(json!({
                    "id": id,
                    "reference": link.reference,
                    "certified_by_authority": link.certified_by_authority,
                    "manufacturer_id": link.manufacturer_id,
                    "article": {
                        "id": link.article_id,
                        "name": article.name,
                        "category_id": article.category_id,
                        "category": { "id": article.category_id, "name": category },
                    },
                    "manufacturer": { "id": link.manufacturer_id, "name": manufacturer },
                }))
            })
            .collect()
    }

    fn reshape(&self, mut row: Value) -> Value {
        if self.shape == JoinShape::Object {
            return row;
        }
        if let Some(category) = row.pointer_mut("/article/category") {
            *category = Value::Array(vec![category.take()]);
        }
        for key in ["article", "manufacturer"] {
            if let Some(joined) = row.get_mut(key) {
                *joined = Value::Array(vec![joined.take()]);
            }
        }
        row
    }
}

fn lookup<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(row, |value, key| value.get(key))
}

fn field<'a>(row: &'a Value, path: &str) -> Result<&'a Value, BackendError> {
    lookup(row, path).ok_or_else(|| BackendError::bad_request(format!("Unknown field: {path}")))
}

fn matches(row: &Value, predicate: &Predicate) -> Result<bool, BackendError> {
    Ok(match predicate {
        Predicate::Contains { field: path, needle } => field(row, path)?
            .as_str()
            .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
        Predicate::Equals { field: path, value } => field(row, path)?.as_i64() == Some(*value),
        Predicate::In { field: path, values } => field(row, path)?
            .as_i64()
            .is_some_and(|id| values.contains(&id)),
    })
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        // Alphabetical first; exact bytes only separate names equal up to case.
        (Value::String(a), Value::String(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn sort_rows(rows: &mut [Value], order: &OrderBy) -> Result<(), BackendError> {
    for row in rows.iter() {
        field(row, &order.field)?;
    }
    rows.sort_by(|a, b| {
        let primary = compare_values(
            lookup(a, &order.field).unwrap_or(&Value::Null),
            lookup(b, &order.field).unwrap_or(&Value::Null),
        );
        let primary = if order.ascending {
            primary
        } else {
            primary.reverse()
        };
        // Ties resolve by id so that pages never overlap.
        primary.then_with(|| compare_values(&a["id"], &b["id"]))
    });
    Ok(())
}

fn project(row: Value, columns: &[String]) -> Value {
    if columns.is_empty() {
        return row;
    }
    match row {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| columns.iter().any(|c| c == key))
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

#[async_trait]
impl DataSource for InMemoryCatalog {
    async fn query(&self, query: DataQuery) -> Result<QueryPage, BackendError> {
        if let Ok(mut log) = self.log.lock() {
            log.push(query.clone());
        }
        if let Some(error) = self.failure.lock().ok().and_then(|f| f.clone()) {
            return Err(error);
        }

        let rows = match query.collection {
            Collection::Products => self.joined_products(),
            Collection::Manufacturers => Self::named_rows(&self.manufacturers),
            Collection::Categories => Self::named_rows(&self.categories),
        };

        let mut matching = Vec::with_capacity(rows.len());
        for row in rows {
            let mut keep = true;
            for predicate in &query.filters {
                if !matches(&row, predicate)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matching.push(row);
            }
        }

        if let Some(order) = &query.order {
            sort_rows(&mut matching, order)?;
        }

        let total_matching = matching.len() as u64;
        let window: Vec<Value> = match query.range {
            Some(range) if range.to < range.from => Vec::new(),
            Some(range) => matching
                .into_iter()
                .skip(usize::try_from(range.from).unwrap_or(usize::MAX))
                .take(usize::try_from(range.to - range.from + 1).unwrap_or(usize::MAX))
                .collect(),
            None => matching,
        };

        let rows = window
            .into_iter()
            .map(|row| project(row, &query.columns))
            .map(|row| match query.collection {
                Collection::Products => self.reshape(row),
                _ => row,
            })
            .collect::<Vec<_>>();

        debug!(collection = %query.collection, rows = rows.len(), total_matching, "Query");
        Ok(QueryPage {
            rows,
            total_matching,
        })
    }
}
