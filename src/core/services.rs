//! Unified service container for filedex
//!
//! Provides shared access to configuration, the embedding backend,
//! and the store.

use crate::core::config::Config;
use crate::core::embedding::{CommandEmbedder, Embedder};
use crate::core::error::Result;
use crate::core::indexer::{validate_root, IndexingPipeline};
use crate::core::storage::{AuditLedger, Store};
use crate::core::types::RunSummary;
use std::path::Path;
use std::sync::Arc;

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Embedding backend, `None` when embeddings are disabled
    pub embedder: Option<Arc<dyn Embedder>>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let embedder = CommandEmbedder::from_config(&config.embedding)
            .map(|e| Arc::new(e) as Arc<dyn Embedder>);
        Self::with_embedder(config, embedder)
    }

    /// Create services with an explicit embedding backend
    pub fn with_embedder(config: Config, embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            config: Arc::new(config),
            embedder,
        }
    }

    /// Open the configured database
    pub fn open_store(&self) -> Result<Arc<Store>> {
        Ok(Arc::new(Store::open(&self.config.storage.db_path)?))
    }

    /// Create an IndexingPipeline writing to `store`
    ///
    /// Pipelines are created per run; batch state never outlives one.
    pub fn create_pipeline(&self, store: Arc<Store>) -> Result<IndexingPipeline> {
        IndexingPipeline::new(&self.config, store, self.embedder.clone())
    }

    /// Audit ledger over `store`
    pub fn ledger(&self, store: Arc<Store>) -> AuditLedger {
        AuditLedger::new(store, self.config.storage.audit_checkpoint)
    }

    /// Validate the root, open the store, and run one indexing pass
    pub async fn index_root(&self, root: &Path) -> Result<RunSummary> {
        let root = validate_root(root)?;
        let store = self.open_store()?;
        let mut pipeline = self.create_pipeline(store)?;
        pipeline.index_directory(&root).await
    }
}
