//! Enrichment orchestrator
//!
//! Owns one pipeline run: loads the queue from the catalog, spawns the fixed
//! worker pool, and waits for drain or shutdown. Graceful shutdown stops the
//! feeder and the workers after their in-flight entries finish; the remaining
//! queue contents are simply not processed this run.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::crawling::queue::WorkQueue;
use crate::crawling::state::{ProgressTracker, RunSummary};
use crate::crawling::worker::EnrichmentWorker;
use crate::domain::entities::CatalogEntry;
use crate::domain::repositories::{MovieStore, TechnicalPageFetcher};
use crate::infrastructure::config::WorkerConfig;
use crate::infrastructure::html_parser::CameraExtractor;

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("worker task panicked: {0}")]
    WorkerJoin(String),
    #[error("queue feeder task panicked: {0}")]
    FeederJoin(String),
}

pub struct EnrichmentOrchestrator {
    fetcher: Arc<dyn TechnicalPageFetcher>,
    extractor: Arc<CameraExtractor>,
    store: Arc<dyn MovieStore>,
    config: WorkerConfig,
    shutdown: CancellationToken,
}

impl EnrichmentOrchestrator {
    pub fn new(
        fetcher: Arc<dyn TechnicalPageFetcher>,
        extractor: Arc<CameraExtractor>,
        store: Arc<dyn MovieStore>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that callers cancel to request a graceful shutdown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs the pipeline over `entries` until the queue drains or shutdown
    /// is requested, then reports the aggregate outcome counts.
    pub async fn run(&self, entries: Vec<CatalogEntry>) -> Result<RunSummary, OrchestratorError> {
        let worker_count = self.config.worker_count.max(1);
        let total = entries.len() as u64;
        info!(total, worker_count, "enrichment run starting");

        let queue = Arc::new(WorkQueue::new(self.config.queue_capacity));
        let progress = Arc::new(ProgressTracker::new(total));

        // Feeder runs alongside the workers so a bounded queue never blocks
        // startup; it closes the queue once every entry is in, which is the
        // workers' drain signal.
        let feeder = {
            let queue = queue.clone();
            let shutdown = self.shutdown.clone();
            tokio::spawn(async move {
                for entry in entries {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        result = queue.enqueue(entry) => {
                            if result.is_err() {
                                break;
                            }
                        }
                    }
                }
                queue.close().await;
            })
        };

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let worker = EnrichmentWorker::new(
                worker_id,
                self.fetcher.clone(),
                self.extractor.clone(),
                self.store.clone(),
            );
            let queue = queue.clone();
            let progress = progress.clone();
            let shutdown = self.shutdown.clone();
            workers.push(tokio::spawn(async move {
                worker.run(queue, progress, shutdown).await;
            }));
        }

        let mut worker_failure = None;
        for result in join_all(workers).await {
            if let Err(e) = result {
                worker_failure.get_or_insert(OrchestratorError::WorkerJoin(e.to_string()));
            }
        }
        if worker_failure.is_some() {
            // With every consumer gone the feeder may be parked on a full
            // queue; cancelling unblocks its select so it can be joined.
            self.shutdown.cancel();
        }
        feeder
            .await
            .map_err(|e| OrchestratorError::FeederJoin(e.to_string()))?;
        if let Some(failure) = worker_failure {
            return Err(failure);
        }

        let summary = progress.summary();
        if self.shutdown.is_cancelled() {
            warn!(
                processed = summary.processed,
                total = summary.total,
                "run interrupted by shutdown"
            );
        } else {
            info!(
                persisted = summary.persisted,
                skipped_already_done = summary.skipped_already_done,
                failed = summary.failed,
                "enrichment run finished"
            );
        }
        Ok(summary)
    }
}
