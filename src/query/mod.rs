//! # Query Compiler
//!
//! Turns the listing parameters (filters, sort, page) into one [`ListingQuery`],
//! and a [`ListingQuery`] into the [`DataQuery`] the backend executes.
//!
//! [`compile`] is pure and cannot fail. [`plan`] wraps it with the one
//! asynchronous step: resolving a manufacturer-name substring to ids. When that
//! resolves to nothing, the plan is [`QueryPlan::NoResults`] and no listing fetch
//! is made, since the join could not match anything.

use crate::directory::{resolve_manufacturer_ids, DirectoryLookupError};
use crate::model::{ListingParams, ListingQuery};
use crate::source::{Collection, DataQuery, DataSource, Predicate};
use tracing::debug;

/// Columns requested for product rows.
pub const PRODUCT_COLUMNS: [&str; 5] = [
    "id",
    "reference",
    "certified_by_authority",
    "article",
    "manufacturer",
];

/// What a listing fetch should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    Fetch(ListingQuery),
    /// The manufacturer-name filter matched no manufacturer: the result is empty.
    NoResults,
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// Builds the listing query for `params`.
///
/// `manufacturer_ids` is the already resolved manufacturer-name filter, if one
/// is set. Pages are 1-based; `offset = (page - 1) * page_size`.
pub fn compile(params: &ListingParams, manufacturer_ids: Option<Vec<i64>>) -> ListingQuery {
    let page_size = u64::from(params.page_size.max(1));
    let page = u64::from(params.page.max(1));

    ListingQuery {
        reference_contains: non_empty(&params.filters.reference),
        manufacturer_id: params.filters.manufacturer_id,
        manufacturer_name_contains: manufacturer_ids
            .as_ref()
            .and_then(|_| non_empty(&params.filters.manufacturer_name)),
        manufacturer_ids,
        category_id: params.filters.category_id,
        sort_key: params.sort.key,
        sort_direction: params.sort.direction,
        offset: (page - 1) * page_size,
        limit: page_size,
    }
}

/// Resolves the manufacturer-name filter (if any), then compiles.
pub async fn plan(
    source: &dyn DataSource,
    params: &ListingParams,
) -> Result<QueryPlan, DirectoryLookupError> {
    let manufacturer_ids = match non_empty(&params.filters.manufacturer_name) {
        Some(name) => {
            let ids = resolve_manufacturer_ids(source, &name).await?;
            if ids.is_empty() {
                debug!(%name, "No manufacturer matches, skipping listing fetch");
                return Ok(QueryPlan::NoResults);
            }
            Some(ids)
        }
        None => None,
    };

    Ok(QueryPlan::Fetch(compile(params, manufacturer_ids)))
}

impl ListingQuery {
    /// The backend request for this listing query.
    ///
    /// The exact-id and resolved-id manufacturer predicates are both applied
    /// when both are set (they are ANDed like every other filter).
    pub fn to_data_query(&self) -> DataQuery {
        let mut query = DataQuery::new(Collection::Products).select(&PRODUCT_COLUMNS);

        if let Some(reference) = &self.reference_contains {
            query = query.filter(Predicate::contains("reference", reference.as_str()));
        }
        if let Some(id) = self.manufacturer_id {
            query = query.filter(Predicate::equals("manufacturer_id", id));
        }
        if let Some(ids) = &self.manufacturer_ids {
            query = query.filter(Predicate::is_in("manufacturer_id", ids.clone()));
        }
        if let Some(id) = self.category_id {
            query = query.filter(Predicate::equals("article.category_id", id));
        }

        let (from, to) = self.window();
        query
            .order_by(self.sort_key.field(), self.sort_direction.is_ascending())
            .range(from, to)
    }
}
