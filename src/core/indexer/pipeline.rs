//! Indexing pipeline orchestration.
//!
//! Drives one run end to end:
//! 1. Walk the directory tree lazily
//! 2. Stat and classify each file
//! 3. Queue records and commit them in batches
//! 4. Wait (bounded) for embedding tasks
//! 5. Rebuild the full-text index
//! 6. Record run bookkeeping in the audit ledger

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::core::config::Config;
use crate::core::embedding::{Embedder, EmbeddingScheduler};
use crate::core::error::{FiledexError, Result};
use crate::core::indexer::{classifier, BatchWriter, FileWalker};
use crate::core::storage::{AuditLedger, Store};
use crate::core::types::{PendingRecord, RunSummary};

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Run phases, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Walking,
    Analyzing,
    Queuing,
    Flushing,
    Draining,
    FinalizeIndex,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Walking => "walking",
            RunState::Analyzing => "analyzing",
            RunState::Queuing => "queuing",
            RunState::Flushing => "flushing",
            RunState::Draining => "draining",
            RunState::FinalizeIndex => "finalize-index",
            RunState::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(state: &mut RunState, next: RunState) {
    if *state != next {
        tracing::debug!("Run state: {} -> {}", state, next);
        *state = next;
    }
}

/// Format a timestamp as ISO-8601 UTC with milliseconds
pub fn iso_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Canonicalize a scan root and check it is a readable directory
pub fn validate_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .map_err(|e| FiledexError::InvalidPath(format!("{}: {e}", path.display())))?;

    if !root.is_dir() {
        return Err(FiledexError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    fs::read_dir(&root)
        .map_err(|e| FiledexError::InvalidPath(format!("{} is not readable: {e}", root.display())))?;

    Ok(root)
}

/// Orchestrates one indexing run
pub struct IndexingPipeline {
    walker: FileWalker,
    store: Arc<Store>,
    embedder: Option<Arc<dyn Embedder>>,
    batch_size: usize,
    flush_retries: usize,
    retry_backoff: Duration,
    audit_checkpoint: bool,
    dimensions: usize,
    max_concurrency: usize,
    drain_timeout: Duration,
    state: RunState,
}

impl IndexingPipeline {
    /// Create a pipeline writing to `store`
    ///
    /// Embeddings are skipped when `embedder` is `None`.
    pub fn new(
        config: &Config,
        store: Arc<Store>,
        embedder: Option<Arc<dyn Embedder>>,
    ) -> Result<Self> {
        let walker = FileWalker::new(config.indexing.exclude_patterns.clone())?;

        Ok(Self {
            walker,
            store,
            embedder,
            batch_size: config.indexing.batch_size.max(1),
            flush_retries: config.indexing.flush_retries,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            audit_checkpoint: config.storage.audit_checkpoint,
            dimensions: config.embedding.dimensions,
            max_concurrency: config.embedding.max_concurrency,
            drain_timeout: Duration::from_secs(config.embedding.drain_timeout_secs),
            state: RunState::Idle,
        })
    }

    /// Override the pause between flush attempts
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Phase the pipeline is in (or finished in)
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Index a directory tree
    ///
    /// Unreadable files are logged and counted as failed. A flush that
    /// still fails after the configured retries aborts the run.
    pub async fn index_directory(&mut self, root: &Path) -> Result<RunSummary> {
        let root = validate_root(root)?;
        let start = Instant::now();
        let ledger = AuditLedger::new(Arc::clone(&self.store), self.audit_checkpoint);

        self.state = RunState::Idle;
        enter(&mut self.state, RunState::Walking);
        tracing::info!("Indexing {:?} (batch size {})", root, self.batch_size);

        ledger.record_or_warn("scanFolder", root.to_string_lossy());
        ledger.record_or_warn("mode", "single");
        ledger.record_or_warn("batchSize", self.batch_size.to_string());
        ledger.record_or_warn("startTime", iso_timestamp(SystemTime::now()));

        let scheduler = self.embedder.as_ref().map(|embedder| {
            EmbeddingScheduler::new(
                Arc::clone(&self.store),
                Arc::clone(embedder),
                self.dimensions,
                self.max_concurrency,
            )
        });
        let mut writer = BatchWriter::new(Arc::clone(&self.store), self.batch_size, scheduler);
        let mut failed = 0;
        let mut seen = 0usize;

        for path in self.walker.walk(&root) {
            seen += 1;
            if seen % 1000 == 0 {
                tracing::info!("Progress: {} files seen", seen);
            }

            enter(&mut self.state, RunState::Analyzing);
            let record = match build_record(&path).await {
                Some(record) => record,
                None => {
                    failed += 1;
                    continue;
                }
            };

            enter(&mut self.state, RunState::Queuing);
            tracing::debug!("Queued {:?}", path);

            match writer.enqueue(record) {
                Ok(None) => {}
                Ok(Some(_)) => enter(&mut self.state, RunState::Flushing),
                Err(e) => {
                    enter(&mut self.state, RunState::Flushing);
                    retry_flush(&mut writer, e, self.flush_retries, self.retry_backoff).await?;
                }
            }
        }

        if writer.queued() > 0 {
            enter(&mut self.state, RunState::Flushing);
            if let Err(e) = writer.flush() {
                retry_flush(&mut writer, e, self.flush_retries, self.retry_backoff).await?;
            }
        }

        enter(&mut self.state, RunState::Draining);
        let embeddings = writer.drain_embeddings(self.drain_timeout).await;

        enter(&mut self.state, RunState::FinalizeIndex);
        let fulltext_rows = match self.store.rebuild_fulltext() {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Full-text rebuild failed: {}", e);
                0
            }
        };

        enter(&mut self.state, RunState::Done);
        let elapsed_secs = start.elapsed().as_secs_f64();
        let summary = RunSummary {
            root,
            processed: writer.processed(),
            skipped: writer.skipped(),
            failed,
            flushes: writer.flush_sizes().to_vec(),
            embeddings_scheduled: writer.embeddings_scheduled(),
            embeddings,
            fulltext_rows,
            elapsed_secs,
        };

        ledger.record_or_warn("endTime", iso_timestamp(SystemTime::now()));
        ledger.record_or_warn("elapsedTime", format!("{elapsed_secs:.2}"));
        ledger.record_or_warn("filesProcessed", summary.processed.to_string());
        ledger.record_or_warn("filesSkipped", summary.skipped.to_string());
        ledger.record_or_warn("filesFailed", summary.failed.to_string());

        tracing::info!(
            "Indexing complete: {} processed, {} skipped, {} failed in {:.2}s",
            summary.processed,
            summary.skipped,
            summary.failed,
            summary.elapsed_secs
        );

        Ok(summary)
    }
}

/// Retry a failed flush; anything but a flush failure is returned as is
async fn retry_flush(
    writer: &mut BatchWriter,
    error: FiledexError,
    retries: usize,
    backoff: Duration,
) -> Result<()> {
    if !error.is_flush_failure() {
        return Err(error);
    }

    let mut last = error;
    for attempt in 1..=retries {
        tracing::warn!("{} (retry {}/{})", last, attempt, retries);
        tokio::time::sleep(backoff * attempt as u32).await;
        match writer.flush() {
            Ok(_) => return Ok(()),
            Err(e) => last = e,
        }
    }

    tracing::error!("Aborting run: {}", last);
    Err(last)
}

/// Stat and classify one path; `None` if it cannot be read or is not UTF-8
async fn build_record(path: &Path) -> Option<PendingRecord> {
    // fullPath is the row identity; a lossy conversion would merge distinct files
    let Some(full_path) = path.to_str() else {
        tracing::warn!("Skipping non UTF-8 path {:?}", path);
        return None;
    };

    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!("Failed to stat {:?}: {}", path, e);
            return None;
        }
    };

    let analysis = classifier::analyze(path).await;
    let content_hash = analysis.content_hash?;

    let now = SystemTime::now();
    let modified = metadata.modified().unwrap_or(now);
    // Birth time is missing on some platforms and filesystems
    let created = metadata.created().unwrap_or(modified);

    Some(PendingRecord {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        full_path: full_path.to_string(),
        file_format: path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default(),
        file_size: metadata.len(),
        is_text_file: analysis.is_text_file,
        content: analysis.content,
        content_hash,
        indexed_at: iso_timestamp(now),
        created_at: iso_timestamp(created),
        modified_at: iso_timestamp(modified),
    })
}
