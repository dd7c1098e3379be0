//! Run progress tracking
//!
//! Counters shared across the worker pool. Every counter is atomic; workers
//! record one terminal outcome per dequeued entry and the tracker emits one
//! progress event per entry as it happens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::entities::CatalogEntry;

/// Terminal state of one catalog entry within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Fetched, parsed and written to the store in this run.
    Persisted,
    /// Already present in the store; no fetch attempted.
    SkippedAlreadyDone,
    /// Fetch or store failed; nothing written, eligible for a later run.
    Failed,
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Persisted => write!(f, "persisted"),
            EntryOutcome::SkippedAlreadyDone => write!(f, "skipped_already_done"),
            EntryOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Aggregate counts for a finished (or cancelled) run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: u64,
    pub processed: u64,
    pub persisted: u64,
    pub skipped_already_done: u64,
    pub failed: u64,
}

/// Shared progress state for one pipeline run.
pub struct ProgressTracker {
    total: u64,
    processed: AtomicU64,
    persisted: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            total,
            processed: AtomicU64::new(0),
            persisted: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Records the terminal outcome of one entry and logs a progress event.
    pub fn record(&self, entry: &CatalogEntry, outcome: EntryOutcome, camera_names: &[String]) {
        let sequence_index = self.processed.fetch_add(1, Ordering::SeqCst) + 1;

        match outcome {
            EntryOutcome::Persisted => self.persisted.fetch_add(1, Ordering::SeqCst),
            EntryOutcome::SkippedAlreadyDone => self.skipped.fetch_add(1, Ordering::SeqCst),
            EntryOutcome::Failed => self.failed.fetch_add(1, Ordering::SeqCst),
        };

        info!(
            target: "isitfilm::progress",
            sequence_index,
            total_count = self.total,
            outcome = %outcome,
            movie_id = %entry.id,
            title = %entry.title,
            cameras = ?camera_names,
            "entry finished"
        );
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.total,
            processed: self.processed.load(Ordering::SeqCst),
            persisted: self.persisted.load(Ordering::SeqCst),
            skipped_already_done: self.skipped.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(id: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: format!("Film {id}"),
            english_title: format!("Film {id}"),
        }
    }

    #[test]
    fn outcome_display_matches_log_vocabulary() {
        assert_eq!(EntryOutcome::Persisted.to_string(), "persisted");
        assert_eq!(
            EntryOutcome::SkippedAlreadyDone.to_string(),
            "skipped_already_done"
        );
        assert_eq!(EntryOutcome::Failed.to_string(), "failed");
    }

    #[test]
    fn summary_reflects_recorded_outcomes() {
        let tracker = ProgressTracker::new(4);

        tracker.record(&entry("tt001"), EntryOutcome::Persisted, &["Cam".to_string()]);
        tracker.record(&entry("tt002"), EntryOutcome::Persisted, &[]);
        tracker.record(&entry("tt003"), EntryOutcome::SkippedAlreadyDone, &[]);
        tracker.record(&entry("tt004"), EntryOutcome::Failed, &[]);

        let summary = tracker.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.processed, 4);
        assert_eq!(summary.persisted, 2);
        assert_eq!(summary.skipped_already_done, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_recording_loses_no_counts() {
        let tracker = Arc::new(ProgressTracker::new(400));

        let mut handles = Vec::new();
        for worker in 0..4 {
            let tracker = tracker.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    tracker.record(
                        &entry(&format!("tt{worker}{i:03}")),
                        EntryOutcome::Persisted,
                        &[],
                    );
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let summary = tracker.summary();
        assert_eq!(summary.processed, 400);
        assert_eq!(summary.persisted, 400);
    }
}
