//! Environment-based configuration.
//!
//! Values come from environment variables when set and valid, otherwise from
//! the defaults:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CATALOG_PAGE_SIZE` | `10` |
//! | `CATALOG_MAILBOX_CAPACITY` | `32` |
//! | `CATALOG_DEFAULT_SORT` | `id` |

use crate::model::SortKey;
use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;

/// Listing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    /// Rows per page. Never zero.
    pub page_size: u32,
    /// Capacity of the listing actor's mailbox.
    pub mailbox_capacity: usize,
    /// Sort key of a fresh listing (always ascending).
    pub default_sort: SortKey,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            default_sort: SortKey::Id,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, valid: impl Fn(&T) -> bool) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            warn!(variable = name, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}

impl ListingConfig {
    /// Reads the configuration from the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_size: parse_var("CATALOG_PAGE_SIZE", |n: &u32| *n > 0)
                .unwrap_or(defaults.page_size),
            mailbox_capacity: parse_var("CATALOG_MAILBOX_CAPACITY", |n: &usize| *n > 0)
                .unwrap_or(defaults.mailbox_capacity),
            default_sort: parse_var("CATALOG_DEFAULT_SORT", |_: &SortKey| true)
                .unwrap_or(defaults.default_sort),
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test touches the process environment so nothing races on it.
    #[test]
    fn test_from_env_overrides_and_fallbacks() {
        env::set_var("CATALOG_PAGE_SIZE", "25");
        env::set_var("CATALOG_MAILBOX_CAPACITY", "0");
        env::set_var("CATALOG_DEFAULT_SORT", "reference");

        let config = ListingConfig::from_env();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.mailbox_capacity, DEFAULT_MAILBOX_CAPACITY);
        assert_eq!(config.default_sort, SortKey::Reference);

        env::set_var("CATALOG_PAGE_SIZE", "zero");
        env::remove_var("CATALOG_MAILBOX_CAPACITY");
        env::set_var("CATALOG_DEFAULT_SORT", "price");
        assert_eq!(ListingConfig::from_env(), ListingConfig::default());

        env::remove_var("CATALOG_PAGE_SIZE");
        env::remove_var("CATALOG_DEFAULT_SORT");
    }

    #[test]
    fn test_zero_page_size_is_ignored() {
        let config = ListingConfig::default().with_page_size(0);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(ListingConfig::default().with_page_size(5).page_size, 5);
    }
}
