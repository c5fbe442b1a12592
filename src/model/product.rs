use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A catalog entry: one article made by one manufacturer, under a reference.
///
/// # Read-only projection
/// A `Product` only ever comes out of [`Product::from_row`]. The backend joins
/// the article, its category and the manufacturer with inner-join semantics, so
/// a row that is missing any of the three never becomes a partial `Product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub reference: String,
    pub certified_by_authority: bool,
    pub article: Article,
    pub manufacturer: ManufacturerRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub name: String,
    pub category: CategoryRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerRef {
    pub name: String,
}

/// A raw row that could not be turned into a [`Product`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NormalizeError {
    /// The row does not have the expected shape at all.
    #[error("Malformed product row: {0}")]
    Shape(String),

    /// A joined entity came back as an empty collection or null.
    #[error("Product {id} is missing its joined {entity}")]
    MissingJoin { id: i64, entity: &'static str },
}

/// A joined entity as the backend returns it: either the object itself or a
/// collection holding it.
///
/// `Many` is listed first so that a JSON array is never mistaken for a struct
/// encoded as a sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Joined<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Joined<T> {
    fn into_first(self) -> Option<T> {
        match self {
            Joined::Many(items) => items.into_iter().next(),
            Joined::One(item) => Some(item),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProductRow {
    id: i64,
    reference: String,
    certified_by_authority: bool,
    #[serde(default)]
    article: Option<Joined<RawArticle>>,
    #[serde(default)]
    manufacturer: Option<Joined<RawNamed>>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    name: String,
    #[serde(default)]
    category: Option<Joined<RawNamed>>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: String,
}

fn first<T>(joined: Option<Joined<T>>, id: i64, entity: &'static str) -> Result<T, NormalizeError> {
    joined
        .and_then(Joined::into_first)
        .ok_or(NormalizeError::MissingJoin { id, entity })
}

impl Product {
    /// Normalizes one raw backend row.
    ///
    /// `article`, `article.category` and `manufacturer` may each be a single
    /// object or a single-element collection; the first element is taken in
    /// the collection case, the same way for all three.
    pub fn from_row(row: serde_json::Value) -> Result<Self, NormalizeError> {
        let raw: RawProductRow =
            serde_json::from_value(row).map_err(|e| NormalizeError::Shape(e.to_string()))?;
        let id = raw.id;

        let article = first(raw.article, id, "article")?;
        let category = first(article.category, id, "category")?;
        let manufacturer = first(raw.manufacturer, id, "manufacturer")?;

        Ok(Self {
            id,
            reference: raw.reference,
            certified_by_authority: raw.certified_by_authority,
            article: Article {
                name: article.name,
                category: CategoryRef {
                    name: category.name,
                },
            },
            manufacturer: ManufacturerRef {
                name: manufacturer.name,
            },
        })
    }
}
