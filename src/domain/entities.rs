use serde::{Deserialize, Serialize};

/// One row of the title catalog snapshot.
///
/// Produced by the catalog loader (ordered, de-duplicated by id) and consumed
/// exactly once by a single worker, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable external identifier (IMDb tconst, e.g. "tt0133093")
    pub id: String,
    /// Original title
    pub title: String,
    /// English (primary) title
    pub english_title: String,
}

/// A persisted movie. Written at most once per id, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub english_title: String,
}

/// Recording medium classification for a camera model.
///
/// Not populated by the ingestion pipeline; reserved for later tagging.
/// Every camera row starts out explicitly `Unclassified` rather than NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    #[default]
    Unclassified,
    Film,
    Digital,
}

/// A persisted camera model. `name` is globally unique across all movies;
/// the surrogate id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Camera {
    pub id: i64,
    pub name: String,
    pub medium: Medium,
}
