//! # Filter Directory Loader
//!
//! Loads the small reference lists behind the manufacturer and category
//! dropdowns, and resolves a manufacturer-name substring to manufacturer ids.
//!
//! Failures here are never fatal: [`load_directory`] logs a failed list and
//! leaves it empty, so the dropdown renders empty while the listing still loads.

pub mod error;

pub use error::DirectoryLookupError;

use crate::model::{FilterDirectory, FilterOption};
use crate::source::{Collection, DataQuery, DataSource, Predicate};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

async fn load_options(
    source: &dyn DataSource,
    collection: Collection,
) -> Result<Vec<FilterOption>, DirectoryLookupError> {
    let query = DataQuery::new(collection)
        .select(&["id", "name"])
        .order_by("name", true);
    let page = source
        .query(query)
        .await
        .map_err(|source| DirectoryLookupError::Backend { collection, source })?;

    page.rows
        .into_iter()
        .map(|row| {
            serde_json::from_value::<FilterOption>(row).map_err(|e| DirectoryLookupError::Decode {
                collection,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// All manufacturers, ordered by name.
#[instrument(skip(source))]
pub async fn load_manufacturers(
    source: &dyn DataSource,
) -> Result<Vec<FilterOption>, DirectoryLookupError> {
    load_options(source, Collection::Manufacturers).await
}

/// All categories, ordered by name.
#[instrument(skip(source))]
pub async fn load_categories(
    source: &dyn DataSource,
) -> Result<Vec<FilterOption>, DirectoryLookupError> {
    load_options(source, Collection::Categories).await
}

#[derive(Deserialize)]
struct IdRow {
    id: i64,
}

/// Ids of every manufacturer whose name contains `name`, ignoring case.
#[instrument(skip(source))]
pub async fn resolve_manufacturer_ids(
    source: &dyn DataSource,
    name: &str,
) -> Result<Vec<i64>, DirectoryLookupError> {
    let collection = Collection::Manufacturers;
    let query = DataQuery::new(collection)
        .select(&["id"])
        .filter(Predicate::contains("name", name));
    let page = source
        .query(query)
        .await
        .map_err(|source| DirectoryLookupError::Backend { collection, source })?;

    let ids = page
        .rows
        .into_iter()
        .map(|row| {
            serde_json::from_value::<IdRow>(row)
                .map(|row| row.id)
                .map_err(|e| DirectoryLookupError::Decode {
                    collection,
                    reason: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = ids.len(), "Resolved manufacturer ids");
    Ok(ids)
}

/// Loads both lists concurrently. A list that fails to load stays empty.
pub async fn load_directory(source: &dyn DataSource) -> FilterDirectory {
    let (manufacturers, categories) =
        tokio::join!(load_manufacturers(source), load_categories(source));

    let manufacturers = manufacturers.unwrap_or_else(|e| {
        warn!(error = %e, "Manufacturer list unavailable");
        Vec::new()
    });
    let categories = categories.unwrap_or_else(|e| {
        warn!(error = %e, "Category list unavailable");
        Vec::new()
    });

    FilterDirectory {
        manufacturers,
        categories,
        loaded: true,
    }
}
