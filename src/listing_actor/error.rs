//! Error types for the listing actor.

use crate::directory::DirectoryLookupError;
use crate::model::NormalizeError;
use crate::source::BackendError;
use thiserror::Error;

/// Errors surfaced by the product listing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ListingError {
    /// The product query failed.
    #[error("Could not load products: {0}")]
    Backend(#[from] BackendError),

    /// The manufacturer-name filter could not be resolved.
    #[error("Could not search manufacturers: {0}")]
    Directory(#[from] DirectoryLookupError),

    /// The backend returned a row that is not a complete product.
    #[error(transparent)]
    MalformedRow(#[from] NormalizeError),

    /// The listing actor is no longer running.
    #[error("Listing actor closed")]
    ActorClosed,

    /// The listing actor dropped the response channel.
    #[error("Listing actor dropped response channel")]
    ActorDropped,
}
