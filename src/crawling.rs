//! Crawling module - the concurrent enrichment pipeline
//!
//! A bounded work queue of catalog entries, a fixed pool of workers that
//! fetch and parse per-title technical pages, and progress tracking across
//! the run. Each queued entry is consumed exactly once and reaches exactly
//! one terminal state: Persisted, SkippedAlreadyDone or Failed.

pub mod orchestrator;
pub mod queue;
pub mod state;
pub mod worker;

// Clean re-exports
pub use orchestrator::{EnrichmentOrchestrator, OrchestratorError};
pub use queue::{QueueError, WorkQueue};
pub use state::{EntryOutcome, ProgressTracker, RunSummary};
pub use worker::{EnrichmentWorker, WorkerError};
