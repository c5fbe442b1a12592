//! Type-safe wrappers around the listing actor's mailbox.

pub mod listing_client;

pub use listing_client::*;
