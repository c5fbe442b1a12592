//! The listing controller: filter/sort/page state and its fetch cycles.

mod actor;
pub mod error;
pub mod fetch;
mod messages;

pub use actor::{ListingActor, ListingContext};
pub use error::*;
pub use fetch::ListingPage;
pub use messages::{IntentOutcome, ListingIntent, ListingRequest};

use crate::clients::ListingClient;
use crate::config::ListingConfig;

/// Creates a new listing actor and its client.
pub fn new(config: &ListingConfig) -> (ListingActor, ListingClient) {
    ListingActor::new(config)
}
