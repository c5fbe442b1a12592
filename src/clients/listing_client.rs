//! # Listing Client
//!
//! The presentation surface's handle on the listing: the intent callbacks plus
//! read access to the current [`ListingState`] and its change notifications.
//! Cheap to clone; the actor stops once every clone is dropped.

use crate::listing_actor::{IntentOutcome, ListingError, ListingIntent, ListingRequest};
use crate::model::{ListingState, SortKey};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// Client for interacting with the listing actor.
#[derive(Clone)]
pub struct ListingClient {
    sender: mpsc::Sender<ListingRequest>,
    state: watch::Receiver<ListingState>,
}

impl ListingClient {
    pub fn new(sender: mpsc::Sender<ListingRequest>, state: watch::Receiver<ListingState>) -> Self {
        Self { sender, state }
    }

    async fn send_intent(&self, intent: ListingIntent) -> Result<IntentOutcome, ListingError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ListingRequest::Intent { intent, respond_to })
            .await
            .map_err(|_| ListingError::ActorClosed)?;
        response.await.map_err(|_| ListingError::ActorDropped)
    }

    /// Free-text reference search. Empty text clears it.
    #[instrument(skip(self))]
    pub async fn set_reference_filter(&self, text: &str) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::SetReferenceFilter(text.to_string()))
            .await
    }

    /// Manufacturer-name search, resolved to manufacturer ids before fetching.
    #[instrument(skip(self))]
    pub async fn set_manufacturer_name_filter(
        &self,
        text: &str,
    ) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::SetManufacturerNameFilter(text.to_string()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_manufacturer_filter(
        &self,
        id: Option<i64>,
    ) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::SetManufacturerFilter(id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_category_filter(&self, id: Option<i64>) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::SetCategoryFilter(id)).await
    }

    /// Sorts by `key`; toggles the direction if `key` is already active.
    #[instrument(skip(self))]
    pub async fn set_sort(&self, key: SortKey) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::SetSort(key)).await
    }

    /// Moves to `page` (1-based). Out-of-range pages are [`IntentOutcome::Ignored`].
    #[instrument(skip(self))]
    pub async fn set_page(&self, page: u32) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::SetPage(page)).await
    }

    #[instrument(skip(self))]
    pub async fn set_page_size(&self, page_size: u32) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::SetPageSize(page_size))
            .await
    }

    /// Re-issues the current query, e.g. after a failed fetch.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<IntentOutcome, ListingError> {
        self.send_intent(ListingIntent::Refresh).await
    }

    /// The state as the actor holds it right now, after everything queued before this call.
    pub async fn snapshot(&self) -> Result<ListingState, ListingError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ListingRequest::Snapshot { respond_to })
            .await
            .map_err(|_| ListingError::ActorClosed)?;
        response.await.map_err(|_| ListingError::ActorDropped)
    }

    /// The last published state.
    pub fn state(&self) -> ListingState {
        self.state.borrow().clone()
    }

    /// Change notifications: the receiver is marked changed on every publish.
    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.state.clone()
    }

    /// Waits until no fetch is outstanding and returns that state.
    pub async fn settled(&self) -> Result<ListingState, ListingError> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !s.loading)
            .await
            .map_err(|_| ListingError::ActorClosed)?;
        Ok((*settled).clone())
    }
}
