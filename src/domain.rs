//! Domain module - core entities and the trait seams workers depend on
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod entities;
pub mod repositories;

pub use entities::{CatalogEntry, Camera, Medium, Movie};
pub use repositories::{FetchError, MovieStore, TechnicalPageFetcher};
