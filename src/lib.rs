//! IsItFilm - movie camera enrichment pipeline
//!
//! This crate enriches an IMDb title catalog with the camera models used in
//! each movie's production, scraped from per-title technical pages and stored
//! in a relational database with strict de-duplication guarantees.

// Module declarations
pub mod crawling;
pub mod domain;
pub mod infrastructure;

// Re-export the pieces the binary and integration tests wire together
pub use crawling::{EnrichmentOrchestrator, EntryOutcome, ProgressTracker, RunSummary, WorkQueue};
pub use domain::entities::{CatalogEntry, Camera, Medium, Movie};
pub use domain::repositories::{FetchError, MovieStore, TechnicalPageFetcher};
pub use infrastructure::config::AppConfig;
