use serde::{Deserialize, Serialize};

/// One entry of a filter dropdown (a manufacturer or a category).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: i64,
    pub name: String,
}

impl FilterOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The reference lists backing the manufacturer and category dropdowns.
///
/// Both lists are ordered by name. Loaded once per listing session; never
/// persisted beyond it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDirectory {
    pub manufacturers: Vec<FilterOption>,
    pub categories: Vec<FilterOption>,
    /// False until the loader has finished (successfully or not).
    pub loaded: bool,
}

impl FilterDirectory {
    pub fn manufacturer(&self, id: i64) -> Option<&FilterOption> {
        self.manufacturers.iter().find(|m| m.id == id)
    }

    pub fn category(&self, id: i64) -> Option<&FilterOption> {
        self.categories.iter().find(|c| c.id == id)
    }
}
