//! # Catalog Listing Demo
//!
//! Seeds an in-memory catalog, mounts the listing and walks through a few
//! intents, printing the table after each one.

use catalog_listing::config::ListingConfig;
use catalog_listing::lifecycle::{setup_tracing, CatalogSystem};
use catalog_listing::model::SortKey;
use catalog_listing::presentation::render_table;
use catalog_listing::session::{session_channel, SessionSignal, TracingNavigator};
use catalog_listing::source::memory::InMemoryCatalog;
use std::sync::Arc;
use tracing::{info, Instrument};

fn seed_catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new()
        .with_category(1, "Meters")
        .with_category(2, "Cables")
        .with_category(3, "Breakers")
        .with_manufacturer(10, "Acme Industries")
        .with_manufacturer(11, "Borealis")
        .with_manufacturer(12, "Acme Lighting")
        .with_article(100, "Smart meter", 1)
        .with_article(101, "Copper cable", 2)
        .with_article(102, "Circuit breaker", 3);

    let manufacturers = [10, 11, 12];
    let articles = [100, 101, 102];
    for id in 1..=24_i64 {
        let prefix = if id % 3 == 0 { "CD" } else { "AB" };
        let index = usize::try_from(id).unwrap_or_default();
        catalog = catalog.with_product(
            id,
            format!("{prefix}-{id:03}"),
            id % 2 == 0,
            articles[index % articles.len()],
            manufacturers[index % manufacturers.len()],
        );
    }
    catalog
}

async fn show(system: &CatalogSystem, label: &str) -> Result<(), String> {
    let state = system.listing.settled().await.map_err(|e| e.to_string())?;
    println!("\n== {label} ==\n{}", render_table(&state));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ListingConfig::from_env();
    info!(page_size = config.page_size, "Starting catalog listing demo");

    let source = Arc::new(seed_catalog());
    let (session_tx, session) = session_channel(SessionSignal::Pending);
    let system = CatalogSystem::start(source, session, Arc::new(TracingNavigator), &config);

    // The session is restored after mount; the first page loads then.
    session_tx
        .send(SessionSignal::Present)
        .map_err(|e| e.to_string())?;

    system
        .listing
        .subscribe()
        .wait_for(|s| s.session.allows_fetch() && !s.loading)
        .await
        .map_err(|e| e.to_string())?;

    let directory = system.directory_loaded().await;
    info!(
        manufacturers = directory.manufacturers.len(),
        categories = directory.categories.len(),
        "Dropdowns ready"
    );
    show(&system, "Initial").await?;

    let span = tracing::info_span!("reference_search");
    async {
        system
            .listing
            .set_reference_filter("AB")
            .await
            .map_err(|e| e.to_string())?;
        system.listing.set_page(2).await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    show(&system, "Reference contains \"AB\", page 2").await?;

    system
        .listing
        .set_reference_filter("")
        .await
        .map_err(|e| e.to_string())?;
    system
        .listing
        .set_category_filter(Some(1))
        .await
        .map_err(|e| e.to_string())?;
    system
        .listing
        .set_sort(SortKey::Reference)
        .await
        .map_err(|e| e.to_string())?;
    system
        .listing
        .set_sort(SortKey::Reference)
        .await
        .map_err(|e| e.to_string())?;
    show(&system, "Category \"Meters\", reference descending").await?;

    system
        .listing
        .set_category_filter(None)
        .await
        .map_err(|e| e.to_string())?;
    system
        .listing
        .set_manufacturer_name_filter("acme")
        .await
        .map_err(|e| e.to_string())?;
    show(&system, "Manufacturer name contains \"acme\"").await?;

    system
        .listing
        .set_manufacturer_name_filter("nobody")
        .await
        .map_err(|e| e.to_string())?;
    show(&system, "Manufacturer name matches nothing").await?;

    system.shutdown().await?;

    info!("Demo completed");
    Ok(())
}
