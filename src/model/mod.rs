//! Pure data structures: the product projection, filter options, the compiled
//! [`ListingQuery`] and the controller-owned [`ListingState`].

pub mod filter;
pub mod product;
pub mod query;
pub mod state;

pub use filter::*;
pub use product::*;
pub use query::*;
pub use state::*;
