// Test helper functions

use async_trait::async_trait;
use filedex::core::config::Config;
use filedex::core::embedding::Embedder;
use filedex::core::error::{FiledexError, Result};
use filedex::core::indexer::IndexingPipeline;
use filedex::core::services::Services;
use filedex::core::storage::Store;
use filedex::core::types::RunSummary;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Config pointing at a database inside `dir`, no embeddings, no checkpoints
#[allow(dead_code)]
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.db_path = dir.path().join("index.db");
    config.storage.audit_checkpoint = false;
    config.embedding.dimensions = 4;
    config.embedding.drain_timeout_secs = 10;
    config
}

/// Create test services with temporary storage
#[allow(dead_code)]
pub fn create_test_services(embedder: Option<Arc<MockEmbedder>>) -> (Services, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);
    let embedder = embedder.map(|e| e as Arc<dyn Embedder>);
    (Services::with_embedder(config, embedder), temp_dir)
}

/// Run one indexing pass over `root` with the given batch size
#[allow(dead_code)]
pub async fn index_tree(
    store: Arc<Store>,
    root: &Path,
    batch_size: usize,
    embedder: Option<Arc<MockEmbedder>>,
) -> RunSummary {
    let mut config = Config::default();
    config.indexing.batch_size = batch_size;
    config.storage.audit_checkpoint = false;
    config.embedding.dimensions = 4;
    config.embedding.drain_timeout_secs = 10;

    let embedder = embedder.map(|e| e as Arc<dyn Embedder>);
    let mut pipeline = IndexingPipeline::new(&config, store, embedder)
        .expect("Pipeline creation should succeed")
        .with_retry_backoff(Duration::from_millis(1));
    pipeline
        .index_directory(root)
        .await
        .expect("Indexing should succeed")
}

/// Deterministic embedder that counts calls per path
///
/// Paths containing "fail" are refused.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockEmbedder {
    pub dims: usize,
    calls: AtomicUsize,
    per_path: Mutex<HashMap<PathBuf, usize>>,
}

#[allow(dead_code)]
impl MockEmbedder {
    pub fn new(dims: usize) -> Arc<Self> {
        Arc::new(Self {
            dims,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, path: &Path) -> usize {
        self.per_path
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// The vector this embedder produces for `path`
    pub fn vector_for(&self, path: &Path) -> Vec<f32> {
        let seed = path.to_string_lossy().len() as f32;
        (0..self.dims).map(|i| seed + i as f32 * 0.25).collect()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, path: &Path) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .per_path
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;

        if path.to_string_lossy().contains("fail") {
            return Err(FiledexError::Embedding("mock refused".to_string()));
        }
        Ok(self.vector_for(path))
    }
}
