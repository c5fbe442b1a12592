//! # Catalog Listing
//!
//! > **A paginated, filterable, sortable product listing driven by one actor.**
//!
//! This crate turns user intents (a reference search, a manufacturer or category
//! pick, a column click, a page change) into backend queries, and keeps a single
//! consistent [`ListingState`](model::ListingState) that a rendering surface can
//! watch.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why an actor?
//!
//! Filter changes arrive faster than the backend answers. If every answer were
//! written straight into shared state, a slow early query could overwrite a fast
//! later one. Instead:
//! - **One owner**: the [`ListingActor`](listing_actor::ListingActor) is the only
//!   writer of the listing state.
//! - **Last issued wins**: every fetch carries a sequence number and only the most
//!   recent one may commit.
//! - **Plain reads**: the state is published on a `watch` channel, so readers never
//!   block the actor.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer has its own error type: [`BackendError`](source::BackendError) for the
//! data source, [`DirectoryLookupError`](directory::DirectoryLookupError) for the
//! manufacturer-name lookup, [`ListingError`](listing_actor::ListingError) for
//! everything the client can observe. Conversions use `#[from]`.
//!
//! ### 2. Async Context Injection
//! The data source, the session signal and the navigator are handed to
//! [`ListingActor::run`](listing_actor::ListingActor::run), not to the constructor.
//!
//! ### 3. Observability
//! `tracing` everywhere; each fetch cycle runs in its own `listing_fetch{seq}` span.
//! See the [`lifecycle::tracing`] module.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`], [`source`])
//! - [`model`]: products as displayed, sort keys, the listing state.
//! - [`source`]: the [`DataSource`](source::DataSource) seam, an in-memory
//!   catalog and mock sources for tests.
//!
//! ### 2. The Compiler ([`query`], [`directory`])
//! - [`query`]: pure translation of listing params into a backend query, plus the
//!   manufacturer-name pre-lookup and its short-circuit.
//! - [`directory`]: the manufacturer and category lists behind the dropdowns.
//!
//! ### 3. The Engine ([`listing_actor`], [`session`])
//! - [`listing_actor`]: the state machine.
//! - [`session`]: the session gate and the redirect hook.
//!
//! ### 4. The Interface ([`clients`], [`presentation`])
//! - [`clients`]: [`ListingClient`](clients::ListingClient), the intent callbacks.
//! - [`presentation`]: view state, pagination summary, sortable columns.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - [`CatalogSystem`](lifecycle::CatalogSystem) starts and stops everything.
//! - [`ListingConfig`](config::ListingConfig) reads `CATALOG_*` environment variables.
//!
//! ## 🚀 Quick Start
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod directory;
pub mod lifecycle;
pub mod listing_actor;
pub mod model;
pub mod presentation;
pub mod query;
pub mod session;
pub mod source;
