//! # Observability & Tracing
//!
//! [`setup_tracing`] installs structured logging for the whole listing.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: "Listing actor started", "Shutdown" with the number of fetches issued
//! - **Intents**: every filter/sort/page change at `debug`
//! - **Fetch cycles**: each fetch runs in a `listing_fetch{seq=N}` span; commits are `info`,
//!   failures `warn`, stale completions `debug`
//! - **Directory**: load failures of the dropdown lists at `warn`
//!
//! ## Usage
//!
//! ```bash
//! # Commits and lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Intents, compiled queries and dropped completions
//! RUST_LOG=debug cargo run
//!
//! # Just the actor
//! RUST_LOG=catalog_listing::listing_actor=debug cargo run
//! ```
//!
//! **With `RUST_LOG=debug`** a superseded fetch looks like:
//!
//! ```text
//! DEBUG Intent intent=SetReferenceFilter("AB")
//! DEBUG Fetch issued seq=2 page=1
//! DEBUG Intent intent=SetPage(2)
//! DEBUG Fetch issued seq=3 page=2
//! DEBUG Stale completion dropped seq=2 latest=3
//! INFO  Committed seq=3 rows=10 total=42
//! ```

/// Initializes the tracing subscriber, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact() // Spans inline, e.g. "listing_fetch{seq=3}: Committed"
        .init();
}
