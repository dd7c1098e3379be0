//! isitfilm binary entry point
//!
//! Wires the catalog loader, HTTP fetcher, SQLite store and worker pool
//! together and runs one enrichment pass over the full movie catalog.
//! Ctrl-C requests a graceful shutdown: workers finish their in-flight
//! entries and the run summary reports what was reached.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use isitfilm::crawling::EnrichmentOrchestrator;
use isitfilm::infrastructure::{
    AppConfig, CameraExtractor, CatalogLoader, DatabaseConnection, HttpClient, MovieRepository,
    logging::init_logging_with_config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    init_logging_with_config(&config.logging)?;

    info!(
        workers = config.workers.worker_count,
        database_url = %config.store.database_url,
        "isitfilm starting"
    );

    let db = DatabaseConnection::new(&config.store.database_url)
        .await
        .context("connecting to the store")?;
    db.migrate().await.context("running store migration")?;
    let repository = MovieRepository::new(db.pool().clone());

    let loader = CatalogLoader::new(config.catalog.clone())?;
    let entries = loader.load_movies().await.context("loading the catalog")?;

    let fetcher = HttpClient::from_fetch_config(&config.fetch)?;
    let extractor = CameraExtractor::new()?;

    let orchestrator = EnrichmentOrchestrator::new(
        Arc::new(fetcher),
        Arc::new(extractor),
        Arc::new(repository.clone()),
        config.workers.clone(),
    );

    let shutdown = orchestrator.cancellation_token();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("shutdown requested, finishing in-flight entries");
        shutdown.cancel();
    });

    let summary = orchestrator.run(entries).await?;
    let store = repository.count_summary().await?;

    info!(
        persisted = summary.persisted,
        skipped_already_done = summary.skipped_already_done,
        failed = summary.failed,
        movies = store.movies,
        cameras = store.cameras,
        links = store.links,
        "run complete"
    );

    Ok(())
}
