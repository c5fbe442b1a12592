//! Error types for the filter directory.

use crate::source::{BackendError, Collection};
use thiserror::Error;

/// A reference list could not be loaded or searched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DirectoryLookupError {
    /// The backend query for the list failed.
    #[error("Failed to load {collection}: {source}")]
    Backend {
        collection: Collection,
        #[source]
        source: BackendError,
    },

    /// The backend answered with rows that are not `{ id, name }` options.
    #[error("Unexpected {collection} row: {reason}")]
    Decode {
        collection: Collection,
        reason: String,
    },
}
