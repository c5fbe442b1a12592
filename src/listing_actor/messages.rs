//! Messages understood by the listing actor.

use super::fetch::ListingPage;
use super::ListingError;
use crate::model::{ListingState, SortKey};
use tokio::sync::oneshot;

/// A user intent coming from the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingIntent {
    SetReferenceFilter(String),
    SetManufacturerNameFilter(String),
    SetManufacturerFilter(Option<i64>),
    SetCategoryFilter(Option<i64>),
    SetSort(SortKey),
    SetPage(u32),
    SetPageSize(u32),
    /// Re-issue the current query unchanged.
    Refresh,
}

/// What the actor did with an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    /// State changed and fetch `seq` was issued.
    Fetching { seq: u64 },
    /// State changed; the fetch waits for a session.
    Deferred,
    /// Nothing changed (out-of-range page, zero page size).
    Ignored,
}

/// Requests sent by [`ListingClient`](crate::clients::ListingClient).
#[derive(Debug)]
pub enum ListingRequest {
    Intent {
        intent: ListingIntent,
        respond_to: oneshot::Sender<IntentOutcome>,
    },
    Snapshot {
        respond_to: oneshot::Sender<ListingState>,
    },
}

/// A fetch task reporting back. Only the latest `seq` may commit.
#[derive(Debug)]
pub(crate) struct FetchCompleted {
    pub seq: u64,
    pub outcome: Result<ListingPage, ListingError>,
}
