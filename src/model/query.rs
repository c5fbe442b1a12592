use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction for the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Asc
    }
}

/// The columns the listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Id,
    ArticleName,
    CategoryName,
    ManufacturerName,
    Reference,
    CertifiedByAuthority,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Id,
        SortKey::ArticleName,
        SortKey::CategoryName,
        SortKey::ManufacturerName,
        SortKey::Reference,
        SortKey::CertifiedByAuthority,
    ];

    /// The backend field path this key orders by.
    pub fn field(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::ArticleName => "article.name",
            SortKey::CategoryName => "article.category.name",
            SortKey::ManufacturerName => "manufacturer.name",
            SortKey::Reference => "reference",
            SortKey::CertifiedByAuthority => "certified_by_authority",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.field() == s)
            .ok_or_else(|| format!("Unknown sort key: {s}"))
    }
}

/// A compiled, declarative description of one listing fetch.
///
/// Built fresh for every filter/sort/page change and never mutated; it is
/// dropped once its fetch resolves or is superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring on the product reference.
    pub reference_contains: Option<String>,
    /// Exact manufacturer id.
    pub manufacturer_id: Option<i64>,
    /// The manufacturer-name filter the id set below was resolved from.
    pub manufacturer_name_contains: Option<String>,
    /// Manufacturer ids resolved from `manufacturer_name_contains`. Never empty.
    pub manufacturer_ids: Option<Vec<i64>>,
    /// Category id, matched through the article.
    pub category_id: Option<i64>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub offset: u64,
    pub limit: u64,
}

impl ListingQuery {
    /// Inclusive row window `[offset, offset + limit - 1]`.
    pub fn window(&self) -> (u64, u64) {
        (self.offset, self.offset + self.limit - 1)
    }
}
