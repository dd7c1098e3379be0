//! Interfaces the enrichment workers depend on
//!
//! Contains trait definitions for the persistence and remote-fetch seams so
//! workers can be exercised against in-memory fakes in tests.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Movie;

/// Outcome classification for a technical page fetch.
///
/// A non-2xx status and a transport-level failure are reported distinctly;
/// neither creates a movie row, so a future run can re-attempt the same id.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status} for {url}")]
    Http { status: u16, url: String },

    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },
}

/// Retrieves the raw technical-page markup for one title id.
#[async_trait]
pub trait TechnicalPageFetcher: Send + Sync {
    async fn fetch_technical_page(&self, title_id: &str) -> Result<String, FetchError>;
}

/// Persistence abstraction for movies, cameras and their associations.
///
/// Both operations are idempotent by design and run inside one transaction
/// scope each; the unique constraint on camera name is the authoritative
/// cross-worker de-duplication mechanism.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Read-only lookup used to skip already-processed catalog entries.
    async fn find_movie(&self, movie_id: &str) -> Result<Option<Movie>>;

    /// Atomically create the movie row plus, for each camera name, either the
    /// existing camera row or a new one, linked many-to-many. Any failure
    /// mid-sequence rolls the whole transaction back.
    async fn upsert_movie_with_cameras(
        &self,
        movie_id: &str,
        title: &str,
        english_title: &str,
        camera_names: &[String],
    ) -> Result<Movie>;
}
