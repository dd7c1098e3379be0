//! Infrastructure layer for database access, HTML parsing and external integrations
//!
//! This module provides the database connection, the movie/camera repository,
//! the technical-page HTTP client, the camera extractor and the catalog
//! snapshot loader.

pub mod catalog_loader;
pub mod config;
pub mod database_connection;
pub mod html_parser;
pub mod http_client;
pub mod logging;
pub mod movie_repository;

// Re-export commonly used items
pub use catalog_loader::CatalogLoader;
pub use config::AppConfig;
pub use database_connection::DatabaseConnection;
pub use html_parser::{CameraExtraction, CameraExtractor};
pub use http_client::HttpClient;
pub use movie_repository::{MovieRepository, StoreSummary};
