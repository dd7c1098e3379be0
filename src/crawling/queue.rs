//! # Work Queue
//!
//! A bounded, concurrency-safe queue of pending catalog entries built on a
//! tokio channel. Entries are loaded once at startup and consumed exactly
//! once across all workers; the queue is never replenished mid-run.

use tokio::sync::{Mutex, mpsc};

use crate::domain::entities::CatalogEntry;

/// Queue operation errors
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("work queue is closed")]
    Closed,
}

/// Bounded work queue with exactly-once consumption.
///
/// Enqueueing applies backpressure by awaiting channel capacity. Dequeueing
/// blocks while the queue is empty and returns `None` once the queue has been
/// closed and drained, which is the workers' termination signal.
pub struct WorkQueue {
    sender: Mutex<Option<mpsc::Sender<CatalogEntry>>>,
    receiver: Mutex<mpsc::Receiver<CatalogEntry>>,
}

impl WorkQueue {
    /// Creates a new work queue holding at most `capacity` pending entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(receiver),
        }
    }

    /// Enqueues one entry, waiting for capacity if the queue is full.
    ///
    /// # Errors
    /// Returns `QueueError::Closed` if the queue was closed.
    pub async fn enqueue(&self, entry: CatalogEntry) -> Result<(), QueueError> {
        let sender = { self.sender.lock().await.clone() };

        match sender {
            Some(sender) => sender.send(entry).await.map_err(|_| QueueError::Closed),
            None => Err(QueueError::Closed),
        }
    }

    /// Dequeues one entry. Returns `None` when the queue is closed and every
    /// entry has been handed to some worker.
    pub async fn dequeue(&self) -> Option<CatalogEntry> {
        self.receiver.lock().await.recv().await
    }

    /// Closes the queue; pending entries remain dequeueable until drained.
    pub async fn close(&self) {
        self.sender.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(id: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: format!("Film {id}"),
            english_title: format!("Film {id}"),
        }
    }

    #[tokio::test]
    async fn enqueue_dequeue_round_trip() {
        let queue = WorkQueue::new(4);

        queue.enqueue(entry("tt001")).await.unwrap();
        let dequeued = queue.dequeue().await.unwrap();
        assert_eq!(dequeued.id, "tt001");
    }

    #[tokio::test]
    async fn dequeue_returns_none_when_closed_and_drained() {
        let queue = WorkQueue::new(4);

        queue.enqueue(entry("tt001")).await.unwrap();
        queue.close().await;

        assert!(queue.dequeue().await.is_some());
        assert!(queue.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn enqueue_after_close_fails() {
        let queue = WorkQueue::new(4);
        queue.close().await;

        assert!(matches!(
            queue.enqueue(entry("tt001")).await,
            Err(QueueError::Closed)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn entries_are_consumed_exactly_once_across_consumers() {
        let queue = Arc::new(WorkQueue::new(64));
        let consumed = Arc::new(AtomicUsize::new(0));

        for i in 0..50 {
            queue.enqueue(entry(&format!("tt{i:03}"))).await.unwrap();
        }
        queue.close().await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let queue = queue.clone();
            let consumed = consumed.clone();
            handles.push(tokio::spawn(async move {
                while queue.dequeue().await.is_some() {
                    consumed.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(consumed.load(Ordering::SeqCst), 50);
    }
}
