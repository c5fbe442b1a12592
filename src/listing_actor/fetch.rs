//! One listing fetch: plan, query, normalize.

use super::ListingError;
use crate::model::{ListingParams, Product};
use crate::query::{plan, QueryPlan};
use crate::source::DataSource;
use tracing::debug;

/// The rows of one page together with the total they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub items: Vec<Product>,
    pub total_count: u64,
}

/// Runs one fetch for `params`.
///
/// An unmatched manufacturer-name filter yields an empty page without a product
/// query.
pub async fn fetch_page(
    source: &dyn DataSource,
    params: &ListingParams,
) -> Result<ListingPage, ListingError> {
    let query = match plan(source, params).await? {
        QueryPlan::NoResults => return Ok(ListingPage::default()),
        QueryPlan::Fetch(query) => query,
    };
    debug!(?query, "Fetching products");

    let page = source.query(query.to_data_query()).await?;
    let items = page
        .rows
        .into_iter()
        .map(Product::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListingPage {
        items,
        total_count: page.total_matching,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListingFilters, ListingSort, NormalizeError};
    use crate::source::memory::{InMemoryCatalog, JoinShape};
    use crate::source::mock::ScriptedSource;
    use crate::source::{Collection, QueryPage};
    use serde_json::json;

    fn params() -> ListingParams {
        ListingParams {
            filters: ListingFilters::default(),
            sort: ListingSort::default(),
            page: 1,
            page_size: 10,
        }
    }

    #[tokio::test]
    async fn test_fetch_normalizes_collection_shaped_rows() {
        let source = InMemoryCatalog::new()
            .with_category(1, "Meters")
            .with_manufacturer(10, "Acme")
            .with_article(100, "Smart meter", 1)
            .with_product(1, "AB-001", true, 100, 10)
            .with_join_shape(JoinShape::Collection);

        let page = fetch_page(&source, &params()).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].article.category.name, "Meters");
        assert_eq!(page.items[0].manufacturer.name, "Acme");
    }

    #[tokio::test]
    async fn test_short_circuit_skips_product_query() {
        let source = InMemoryCatalog::new().with_manufacturer(10, "Acme");
        let mut p = params();
        p.filters.manufacturer_name = "zzz".into();

        let page = fetch_page(&source, &p).await.unwrap();
        assert_eq!(page, ListingPage::default());
        assert_eq!(source.queries_on(Collection::Products), 0);
    }

    #[tokio::test]
    async fn test_malformed_row_fails_the_fetch() {
        let source = ScriptedSource::new();
        source.expect(Collection::Products).return_ok(QueryPage {
            rows: vec![json!({
                "id": 5,
                "reference": "R",
                "certified_by_authority": false,
                "manufacturer": { "name": "A" }
            })],
            total_matching: 1,
        });

        let err = fetch_page(&source, &params()).await.unwrap_err();
        assert_eq!(
            err,
            ListingError::MalformedRow(NormalizeError::MissingJoin {
                id: 5,
                entity: "article"
            })
        );
    }
}
