//! Error type for the data query interface.

use thiserror::Error;

/// A failed data query: transport, auth or server failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Backend error ({status}): {message}")]
pub struct BackendError {
    pub status: u16,
    pub message: String,
}

impl BackendError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The source answered with something it should not have (e.g. an unknown field).
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(503, message)
    }
}
