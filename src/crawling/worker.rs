//! Enrichment worker
//!
//! One worker of the fixed pool. Pulls entries off the shared queue until the
//! queue drains or shutdown is requested, and drives each entry through the
//! skip-check / fetch / extract / persist sequence to a terminal outcome.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::crawling::queue::WorkQueue;
use crate::crawling::state::{EntryOutcome, ProgressTracker};
use crate::domain::entities::CatalogEntry;
use crate::domain::repositories::{FetchError, MovieStore, TechnicalPageFetcher};
use crate::infrastructure::html_parser::{CameraExtraction, CameraExtractor};

/// Why one entry failed to persist
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] FetchError),
    #[error("store transaction failed: {0}")]
    Store(anyhow::Error),
}

pub struct EnrichmentWorker {
    worker_id: usize,
    fetcher: Arc<dyn TechnicalPageFetcher>,
    extractor: Arc<CameraExtractor>,
    store: Arc<dyn MovieStore>,
}

impl EnrichmentWorker {
    pub fn new(
        worker_id: usize,
        fetcher: Arc<dyn TechnicalPageFetcher>,
        extractor: Arc<CameraExtractor>,
        store: Arc<dyn MovieStore>,
    ) -> Self {
        Self {
            worker_id,
            fetcher,
            extractor,
            store,
        }
    }

    /// Consumes entries until the queue drains or shutdown is requested.
    /// An in-flight entry is always finished before the worker exits.
    pub async fn run(
        &self,
        queue: Arc<WorkQueue>,
        progress: Arc<ProgressTracker>,
        shutdown: CancellationToken,
    ) {
        info!(worker_id = self.worker_id, "worker started");

        loop {
            let entry = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(worker_id = self.worker_id, "worker stopping on shutdown");
                    break;
                }
                entry = queue.dequeue() => match entry {
                    Some(entry) => entry,
                    None => {
                        debug!(worker_id = self.worker_id, "queue drained, worker exiting");
                        break;
                    }
                },
            };

            self.process(&entry, &progress).await;
        }
    }

    async fn process(&self, entry: &CatalogEntry, progress: &ProgressTracker) {
        match self.try_process(entry).await {
            Ok((outcome, camera_names)) => progress.record(entry, outcome, &camera_names),
            Err(error) => {
                warn!(
                    worker_id = self.worker_id,
                    movie_id = %entry.id,
                    title = %entry.title,
                    error = %error,
                    "entry failed"
                );
                progress.record(entry, EntryOutcome::Failed, &[]);
            }
        }
    }

    async fn try_process(
        &self,
        entry: &CatalogEntry,
    ) -> Result<(EntryOutcome, Vec<String>), WorkerError> {
        // A movie row means this entry was fully persisted by an earlier run.
        if self
            .store
            .find_movie(&entry.id)
            .await
            .map_err(WorkerError::Store)?
            .is_some()
        {
            return Ok((EntryOutcome::SkippedAlreadyDone, Vec::new()));
        }

        let html = self.fetcher.fetch_technical_page(&entry.id).await?;

        let camera_names = match self.extractor.extract_camera_names(&html) {
            CameraExtraction::Cameras(names) => names,
            CameraExtraction::SectionAbsent => {
                debug!(movie_id = %entry.id, "no camera section on technical page");
                Vec::new()
            }
        };

        self.store
            .upsert_movie_with_cameras(&entry.id, &entry.title, &entry.english_title, &camera_names)
            .await
            .map_err(WorkerError::Store)?;

        Ok((EntryOutcome::Persisted, camera_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::domain::entities::Movie;

    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl TechnicalPageFetcher for MapFetcher {
        async fn fetch_technical_page(&self, title_id: &str) -> Result<String, FetchError> {
            self.pages
                .get(title_id)
                .cloned()
                .ok_or_else(|| FetchError::Http {
                    status: 404,
                    url: format!("test://{title_id}"),
                })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        movies: Mutex<HashMap<String, (Movie, Vec<String>)>>,
    }

    #[async_trait]
    impl MovieStore for MemoryStore {
        async fn find_movie(&self, movie_id: &str) -> Result<Option<Movie>> {
            Ok(self
                .movies
                .lock()
                .map_err(|_| anyhow!("poisoned"))?
                .get(movie_id)
                .map(|(movie, _)| movie.clone()))
        }

        async fn upsert_movie_with_cameras(
            &self,
            movie_id: &str,
            title: &str,
            english_title: &str,
            camera_names: &[String],
        ) -> Result<Movie> {
            let movie = Movie {
                id: movie_id.to_string(),
                title: title.to_string(),
                english_title: english_title.to_string(),
            };
            self.movies
                .lock()
                .map_err(|_| anyhow!("poisoned"))?
                .insert(movie_id.to_string(), (movie.clone(), camera_names.to_vec()));
            Ok(movie)
        }
    }

    fn technical_page(camera_value: &str) -> String {
        format!(
            "<table><tr><td>Camera</td><td>{camera_value}</td></tr>\
             <tr><td>Film Length</td><td>3,000 m</td></tr></table>"
        )
    }

    fn worker_over(pages: HashMap<String, String>, store: Arc<MemoryStore>) -> EnrichmentWorker {
        EnrichmentWorker::new(
            0,
            Arc::new(MapFetcher { pages }),
            Arc::new(CameraExtractor::new().unwrap()),
            store,
        )
    }

    fn entry(id: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: format!("Film {id}"),
            english_title: format!("Film {id}"),
        }
    }

    #[tokio::test]
    async fn persists_extracted_cameras() {
        let store = Arc::new(MemoryStore::default());
        let mut pages = HashMap::new();
        pages.insert(
            "tt001".to_string(),
            technical_page("Arriflex 435, Zeiss Lenses"),
        );
        let worker = worker_over(pages, store.clone());

        let (outcome, cameras) = worker.try_process(&entry("tt001")).await.unwrap();
        assert_eq!(outcome, EntryOutcome::Persisted);
        assert_eq!(cameras, vec!["Arriflex 435".to_string()]);
        assert!(store.find_movie("tt001").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn skips_entries_already_in_the_store() {
        let store = Arc::new(MemoryStore::default());
        store
            .upsert_movie_with_cameras("tt001", "Film tt001", "Film tt001", &[])
            .await
            .unwrap();
        let worker = worker_over(HashMap::new(), store);

        let (outcome, cameras) = worker.try_process(&entry("tt001")).await.unwrap();
        assert_eq!(outcome, EntryOutcome::SkippedAlreadyDone);
        assert!(cameras.is_empty());
    }

    #[tokio::test]
    async fn missing_camera_section_still_persists_the_movie() {
        let store = Arc::new(MemoryStore::default());
        let mut pages = HashMap::new();
        pages.insert(
            "tt001".to_string(),
            "<table><tr><td>Runtime</td><td>90 min</td></tr></table>".to_string(),
        );
        let worker = worker_over(pages, store.clone());

        let (outcome, cameras) = worker.try_process(&entry("tt001")).await.unwrap();
        assert_eq!(outcome, EntryOutcome::Persisted);
        assert!(cameras.is_empty());
        assert!(store.find_movie("tt001").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn fetch_failure_writes_nothing() {
        let store = Arc::new(MemoryStore::default());
        let worker = worker_over(HashMap::new(), store.clone());

        let result = worker.try_process(&entry("tt404")).await;
        assert!(matches!(result, Err(WorkerError::SourceUnavailable(_))));
        assert!(store.find_movie("tt404").await.unwrap().is_none());
    }
}
