//! # Listing Lifecycle & Orchestration
//!
//! Starts, wires and stops everything one mounted listing needs.
//!
//! **Key Responsibilities:**
//! 1. **Actor Creation** - the listing actor and its [`ListingClient`](crate::clients::ListingClient)
//! 2. **Dependency Injection** - data source, session signal and navigator go in through `run()`
//! 3. **Filter Directory** - loaded once per session, concurrently with the first fetch
//! 4. **Graceful Shutdown** - dropping the client closes the mailbox; the actor drains and exits
//! 5. **Observability Setup** - [`setup_tracing`]

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::*;
pub use self::tracing::*;
