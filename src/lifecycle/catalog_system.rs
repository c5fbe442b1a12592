use crate::clients::ListingClient;
use crate::config::ListingConfig;
use crate::directory::load_directory;
use crate::listing_actor::ListingContext;
use crate::model::FilterDirectory;
use crate::session::{Navigator, SessionSignal};
use crate::source::DataSource;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// One mounted listing session.
///
/// `CatalogSystem` is responsible for:
/// - **Lifecycle Management**: starting the listing actor and stopping it again
/// - **Dependency Wiring**: handing the actor its data source, session and navigator
/// - **Filter Directory**: loading the dropdown lists once, alongside the first fetch
///
/// # Example
///
/// ```ignore
/// let (session_tx, session) = session_channel(SessionSignal::Pending);
/// let system = CatalogSystem::start(source, session, navigator, &ListingConfig::default());
///
/// session_tx.send(SessionSignal::Present)?;
/// system.listing.set_reference_filter("AB").await?;
/// let state = system.listing.settled().await?;
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    /// Client for the listing actor.
    pub listing: ListingClient,

    /// The filter directory; `loaded` flips once the loader has finished.
    pub directory: watch::Receiver<FilterDirectory>,

    /// Task handles (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts the listing actor and the directory loader.
    ///
    /// The two run independently; no ordering between them is guaranteed.
    pub fn start(
        source: Arc<dyn DataSource>,
        session: watch::Receiver<SessionSignal>,
        navigator: Arc<dyn Navigator>,
        config: &ListingConfig,
    ) -> Self {
        let (listing_actor, listing) = crate::listing_actor::new(config);

        let (directory_tx, directory) = watch::channel(FilterDirectory::default());
        let directory_source = source.clone();
        let directory_handle = tokio::spawn(async move {
            let loaded = load_directory(directory_source.as_ref()).await;
            info!(
                manufacturers = loaded.manufacturers.len(),
                categories = loaded.categories.len(),
                "Filter directory loaded"
            );
            directory_tx.send_replace(loaded);
        });

        let listing_handle = tokio::spawn(listing_actor.run(ListingContext {
            source,
            session,
            navigator,
        }));

        Self {
            listing,
            directory,
            handles: vec![directory_handle, listing_handle],
        }
    }

    /// Waits for the directory loader and returns what it loaded.
    pub async fn directory_loaded(&self) -> FilterDirectory {
        let mut directory = self.directory.clone();
        let loaded = match directory.wait_for(|d| d.loaded).await {
            Ok(loaded) => (*loaded).clone(),
            Err(_) => self.directory.borrow().clone(),
        };
        loaded
    }

    /// Drops the client, which closes the actor's mailbox, then waits for both tasks.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down listing...");
        drop(self.listing);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Listing task failed: {:?}", e);
                return Err(format!("Listing task failed: {:?}", e));
            }
        }

        info!("Listing shutdown complete.");
        Ok(())
    }
}
