use super::{Product, SortDirection, SortKey};
use crate::session::SessionSignal;

/// The user-chosen filters. Empty text means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilters {
    pub reference: String,
    pub manufacturer_name: String,
    pub manufacturer_id: Option<i64>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl ListingSort {
    /// Re-selecting the active key flips the direction; a new key starts ascending.
    pub fn select(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// Everything the query compiler needs to build one [`ListingQuery`](super::ListingQuery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingParams {
    pub filters: ListingFilters,
    pub sort: ListingSort,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
}

/// The state of the product listing, owned by the listing actor.
///
/// `items` and `total_count` are only ever replaced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    pub filters: ListingFilters,
    pub sort: ListingSort,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<Product>,
    pub total_count: u64,
    pub loading: bool,
    /// Set by the first completed fetch, successful or not.
    pub loaded: bool,
    /// User-visible message of the last failed fetch, cleared when a new fetch starts.
    pub last_error: Option<String>,
    pub session: SessionSignal,
}

impl ListingState {
    pub fn new(page_size: u32, sort: ListingSort) -> Self {
        Self {
            filters: ListingFilters::default(),
            sort,
            page: 1,
            page_size: page_size.max(1),
            items: Vec::new(),
            total_count: 0,
            loading: false,
            loaded: false,
            last_error: None,
            session: SessionSignal::Pending,
        }
    }

    /// `max(1, ceil(total_count / page_size))`.
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total_count.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn accepts_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    pub fn params(&self) -> ListingParams {
        ListingParams {
            filters: self.filters.clone(),
            sort: self.sort,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(10, ListingSort::default())
    }
}
