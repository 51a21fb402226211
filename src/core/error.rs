//! Error types and error handling for filedex.
//!
//! This module defines the error types used throughout the
//! indexer. Per-item failures (unreadable files, embedding calls)
//! are logged and counted by the pipeline and never surface here;
//! what does surface is either a setup failure or a failed flush.

use thiserror::Error;

/// Result type alias for filedex operations
pub type Result<T> = std::result::Result<T, FiledexError>;

/// Main error type for filedex
#[derive(Error, Debug)]
pub enum FiledexError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Batch flush failed: {0}")]
    FlushFailed(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl FiledexError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error happened before any indexing work began
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            FiledexError::InvalidPath(_)
                | FiledexError::ConfigError(_)
                | FiledexError::TomlError(_)
                | FiledexError::Database(_)
        )
    }

    /// Check if this error aborted a batch commit
    pub fn is_flush_failure(&self) -> bool {
        matches!(self, FiledexError::FlushFailed(_))
    }
}
