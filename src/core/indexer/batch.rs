//! Batch writer.
//!
//! Buffers classified records and commits them in bounded
//! transactions. The queue is cleared only after a commit succeeds,
//! so a failed flush can be retried with the same records and the
//! counters never drift from what is actually stored.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::core::embedding::EmbeddingScheduler;
use crate::core::error::{FiledexError, Result};
use crate::core::storage::Store;
use crate::core::types::{DrainReport, FlushReport, PendingRecord};

/// Owned per run; not shared between runs
pub struct BatchWriter {
    store: Arc<Store>,
    batch_size: usize,
    queue: Vec<PendingRecord>,
    embeddings: Option<EmbeddingScheduler>,
    processed: usize,
    skipped: usize,
    flush_sizes: Vec<usize>,
}

impl BatchWriter {
    /// Create a writer; a zero batch size is treated as 1
    pub fn new(store: Arc<Store>, batch_size: usize, embeddings: Option<EmbeddingScheduler>) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            store,
            batch_size,
            queue: Vec::with_capacity(batch_size),
            embeddings,
            processed: 0,
            skipped: 0,
            flush_sizes: Vec::new(),
        }
    }

    /// Queue a record, flushing when the batch is full
    ///
    /// On a flush failure the record stays queued.
    pub fn enqueue(&mut self, record: PendingRecord) -> Result<Option<FlushReport>> {
        self.queue.push(record);
        if self.queue.len() >= self.batch_size {
            return self.flush().map(Some);
        }
        Ok(None)
    }

    /// Commit everything queued in one transaction
    ///
    /// An empty queue is a no-op and is not recorded as a flush.
    pub fn flush(&mut self) -> Result<FlushReport> {
        if self.queue.is_empty() {
            return Ok(FlushReport::default());
        }

        let committed = self
            .store
            .commit_batch(&self.queue)
            .map_err(|e| FiledexError::FlushFailed(e.to_string()))?;

        let mut report = FlushReport {
            rows: committed.len(),
            ..FlushReport::default()
        };

        for row in &committed {
            if row.inserted {
                report.inserted += 1;
            } else {
                report.bumped += 1;
            }

            if let Some(scheduler) = self.embeddings.as_mut() {
                match self.store.has_vector(row.id) {
                    Ok(true) => {}
                    Ok(false) => {
                        if scheduler.schedule(row.id, PathBuf::from(&row.full_path)) {
                            report.embeddings_scheduled += 1;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Vector lookup failed for {}: {}", row.full_path, e);
                    }
                }
            }
        }

        self.processed += report.inserted;
        self.skipped += report.bumped;
        self.flush_sizes.push(report.rows);
        self.queue.clear();

        tracing::debug!(
            "Flushed {} rows ({} new, {} bumped, {} embeddings scheduled)",
            report.rows,
            report.inserted,
            report.bumped,
            report.embeddings_scheduled
        );

        Ok(report)
    }

    /// Wait for scheduled embeddings, bounded by `timeout`
    pub async fn drain_embeddings(&mut self, timeout: Duration) -> DrainReport {
        match self.embeddings.as_mut() {
            Some(scheduler) => scheduler.drain(timeout).await,
            None => DrainReport::default(),
        }
    }

    /// Records waiting for the next flush
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// New rows committed so far
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Bumped rows committed so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Row count of every committed flush, in order
    pub fn flush_sizes(&self) -> &[usize] {
        &self.flush_sizes
    }

    /// Embedding requests issued so far
    pub fn embeddings_scheduled(&self) -> usize {
        self.embeddings
            .as_ref()
            .map(EmbeddingScheduler::scheduled_count)
            .unwrap_or(0)
    }
}
