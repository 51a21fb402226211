//! Configuration management for filedex.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{FiledexError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Records committed per storage transaction
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Extra attempts for a flush that failed at transaction level
    #[serde(default = "default_flush_retries")]
    pub flush_retries: usize,

    /// Additional glob patterns to skip (matched against full paths)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Force a WAL checkpoint after every audit write
    #[serde(default = "default_audit_checkpoint")]
    pub audit_checkpoint: bool,
}

/// Embedding gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// External program producing a JSON float array for a file path.
    /// Embeddings are disabled when unset.
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments passed before the file path
    #[serde(default)]
    pub args: Vec<String>,

    /// Vector length produced by the model
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Timeout for one embedding call
    #[serde(default = "default_embed_timeout")]
    pub timeout_secs: u64,

    /// Bounded wait for in-flight embeddings at the end of a run
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_secs: u64,

    /// Embedding calls allowed to run at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_batch_size() -> usize {
    100
}

fn default_flush_retries() -> usize {
    1
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/index.db")
}

fn default_audit_checkpoint() -> bool {
    true
}

fn default_dimensions() -> usize {
    768
}

fn default_embed_timeout() -> u64 {
    60
}

fn default_drain_timeout() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            flush_retries: default_flush_retries(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            audit_checkpoint: default_audit_checkpoint(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            dimensions: default_dimensions(),
            timeout_secs: default_embed_timeout(),
            drain_timeout_secs: default_drain_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl EmbeddingConfig {
    /// Embeddings run only when an external command is configured
    pub fn is_enabled(&self) -> bool {
        self.command
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| FiledexError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. FILEDEX_CONFIG env var
    /// 2. XDG config file (~/.config/filedex/config.toml)
    /// 3. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let config_file = xdg.config_file();
        let mut config = if config_file.exists() {
            Self::from_file(config_file)?
        } else {
            Self::default()
        };

        // The database lives in the XDG data directory unless set explicitly
        if config.storage.db_path == default_db_path() {
            config.storage.db_path = xdg.database_path();
        }

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(batch_size) = env::var("FILEDEX_BATCH_SIZE") {
            if let Ok(size) = batch_size.parse() {
                self.indexing.batch_size = size;
            }
        }
        if let Ok(retries) = env::var("FILEDEX_FLUSH_RETRIES") {
            if let Ok(r) = retries.parse() {
                self.indexing.flush_retries = r;
            }
        }

        if let Ok(db_path) = env::var("FILEDEX_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }

        if let Ok(command) = env::var("FILEDEX_EMBED_COMMAND") {
            self.embedding.command = Some(command);
        }
        if let Ok(dimensions) = env::var("FILEDEX_EMBED_DIMENSIONS") {
            if let Ok(d) = dimensions.parse() {
                self.embedding.dimensions = d;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.indexing.batch_size == 0 {
            return Err(FiledexError::ConfigError(
                "Batch size must be non-zero".to_string(),
            ));
        }

        for pattern in &self.indexing.exclude_patterns {
            glob::Pattern::new(pattern).map_err(|e| {
                FiledexError::ConfigError(format!("Invalid exclude pattern '{pattern}': {e}"))
            })?;
        }

        if self.storage.db_path.as_os_str().is_empty() {
            return Err(FiledexError::ConfigError(
                "Database path must not be empty".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(FiledexError::ConfigError(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        if self.embedding.max_concurrency == 0 {
            return Err(FiledexError::ConfigError(
                "Embedding concurrency must be non-zero".to_string(),
            ));
        }

        if self.embedding.timeout_secs == 0 {
            return Err(FiledexError::ConfigError(
                "Embedding timeout must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Batch size: {}", self.indexing.batch_size);
        tracing::info!("  Flush retries: {}", self.indexing.flush_retries);
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.indexing.exclude_patterns.len()
        );
        tracing::info!("  Database: {:?}", self.storage.db_path);
        tracing::info!("  Audit checkpoint: {}", self.storage.audit_checkpoint);
        match &self.embedding.command {
            Some(command) if self.embedding.is_enabled() => {
                tracing::info!("  Embedding command: {}", command);
                tracing::info!("  Embedding dimensions: {}", self.embedding.dimensions);
            }
            _ => tracing::info!("  Embeddings: disabled"),
        }
    }
}
