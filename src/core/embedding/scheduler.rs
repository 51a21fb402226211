//! Fire-and-forget embedding scheduler.
//!
//! Each scheduled id becomes a tokio task that calls the embedder,
//! checks the vector length, and writes the vector with an
//! idempotent insert. Tasks are tracked in a [`JoinSet`] so the run
//! can wait for them, for a bounded time, before finishing.
//! Finished tasks are collected each time a new one is scheduled.
//! Anything still pending when the process exits is lost; the
//! affected files stay vectorless and are picked up by the next scan.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

use super::Embedder;
use crate::core::error::{FiledexError, Result};
use crate::core::storage::Store;
use crate::core::types::DrainReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Written,
    Unchanged,
    Failed,
}

/// Tracks in-flight embedding tasks for one run
pub struct EmbeddingScheduler {
    store: Arc<Store>,
    embedder: Arc<dyn Embedder>,
    dimensions: usize,
    permits: Arc<Semaphore>,
    pending: JoinSet<Outcome>,
    scheduled: HashSet<i64>,
    /// Outcomes of tasks already collected from `pending`
    finished: DrainReport,
}

impl EmbeddingScheduler {
    pub fn new(
        store: Arc<Store>,
        embedder: Arc<dyn Embedder>,
        dimensions: usize,
        max_concurrency: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            dimensions,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            pending: JoinSet::new(),
            scheduled: HashSet::new(),
            finished: DrainReport::default(),
        }
    }

    /// Spawn an embedding task for a committed file
    ///
    /// Returns false if the id was already scheduled in this run.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, id: i64, path: PathBuf) -> bool {
        if !self.scheduled.insert(id) {
            return false;
        }
        self.reap_finished();

        let store = Arc::clone(&self.store);
        let embedder = Arc::clone(&self.embedder);
        let permits = Arc::clone(&self.permits);
        let dimensions = self.dimensions;

        self.pending.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return Outcome::Failed,
            };

            match embed_and_store(store, embedder.as_ref(), id, &path, dimensions).await {
                Ok(true) => {
                    tracing::debug!("Stored embedding for id {} ({:?})", id, path);
                    Outcome::Written
                }
                Ok(false) => Outcome::Unchanged,
                Err(e) => {
                    tracing::warn!("Embedding failed for {:?}: {}", path, e);
                    Outcome::Failed
                }
            }
        });

        true
    }

    /// Number of ids scheduled so far in this run
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.len()
    }

    /// Tasks not yet collected
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Collect tasks that already completed, without waiting
    ///
    /// Keeps `pending` bounded by the tasks actually in flight.
    pub fn reap_finished(&mut self) {
        while let Some(result) = self.pending.try_join_next() {
            tally(&mut self.finished, result);
        }
    }

    /// Wait up to `timeout` for pending tasks
    ///
    /// Tasks still running at the deadline are aborted and counted
    /// as abandoned.
    pub async fn drain(&mut self, timeout: Duration) -> DrainReport {
        let mut report = std::mem::take(&mut self.finished);
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            match tokio::time::timeout_at(deadline, self.pending.join_next()).await {
                Ok(Some(result)) => tally(&mut report, result),
                Ok(None) => break,
                Err(_) => {
                    report.abandoned = self.pending.len();
                    tracing::warn!(
                        "Abandoning {} embedding tasks after {:?}",
                        report.abandoned,
                        timeout
                    );
                    self.pending.abort_all();
                    break;
                }
            }
        }

        report
    }
}

fn tally(report: &mut DrainReport, result: std::result::Result<Outcome, JoinError>) {
    match result {
        Ok(Outcome::Written) => report.written += 1,
        Ok(Outcome::Unchanged) => report.unchanged += 1,
        Ok(Outcome::Failed) => report.failed += 1,
        Err(e) => {
            tracing::warn!("Embedding task panicked or was cancelled: {}", e);
            report.failed += 1;
        }
    }
}

async fn embed_and_store(
    store: Arc<Store>,
    embedder: &dyn Embedder,
    id: i64,
    path: &std::path::Path,
    dimensions: usize,
) -> Result<bool> {
    let vector = embedder.embed(path).await?;
    if vector.len() != dimensions {
        return Err(FiledexError::Embedding(format!(
            "Expected {} dimensions, got {}",
            dimensions,
            vector.len()
        )));
    }

    tokio::task::spawn_blocking(move || store.put_vector(id, &vector))
        .await
        .map_err(|e| FiledexError::Storage(format!("Vector write task failed: {e}")))?
}
