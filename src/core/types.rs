//! Core data types for filedex.
//!
//! Records flowing through the indexing pipeline, the rows read
//! back from storage, and the reports each stage produces.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of streaming one file through the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// SHA-256 hex digest of the whole file; `None` if the read failed
    pub content_hash: Option<String>,

    /// Whether the leading bytes look like text
    pub is_text_file: bool,

    /// Decoded leading bytes for text files, empty otherwise
    pub content: String,
}

impl Analysis {
    /// Result returned when the file could not be read
    pub fn unreadable() -> Self {
        Self {
            content_hash: None,
            is_text_file: false,
            content: String::new(),
        }
    }
}

/// A classified file waiting in the batch queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    pub file_name: String,
    pub full_path: String,
    pub file_format: String,
    pub file_size: u64,
    pub is_text_file: bool,
    pub content: String,
    pub content_hash: String,
    pub indexed_at: String,
    pub created_at: String,
    pub modified_at: String,
}

/// A persisted file row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub file_name: String,
    pub full_path: String,
    pub file_format: String,
    pub file_size: u64,
    pub is_text_file: bool,
    pub content: String,
    pub content_hash: String,
    pub indexed_at: String,
    pub created_at: String,
    pub modified_at: String,
    pub update_ident: i64,
}

/// Outcome of upserting one row inside a flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedRow {
    pub id: i64,
    pub full_path: String,
    pub update_ident: i64,
    /// True for a new path, false for a version bump
    pub inserted: bool,
}

/// A run metadata entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub audit_key: String,
    pub audit_value: String,
    pub update_ident: i64,
}

/// A nearest-neighbour hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: i64,
    pub distance: f32,
}

/// Statistics from one committed flush
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushReport {
    /// Rows committed in the transaction
    pub rows: usize,

    /// Rows created for new paths
    pub inserted: usize,

    /// Existing rows whose version was bumped
    pub bumped: usize,

    /// Embedding requests scheduled after the commit
    pub embeddings_scheduled: usize,
}

/// Outcome of waiting for in-flight embeddings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Vectors written by this run
    pub written: usize,

    /// Tasks that finished without writing (vector already present)
    pub unchanged: usize,

    /// Tasks whose embedding call or write failed
    pub failed: usize,

    /// Tasks still running when the wait ran out
    pub abandoned: usize,
}

/// Summary of one indexing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Root directory that was walked
    pub root: PathBuf,

    /// New rows inserted
    pub processed: usize,

    /// Existing rows bumped (path already indexed)
    pub skipped: usize,

    /// Files that could not be read or analyzed
    pub failed: usize,

    /// Row count of every committed flush, in order
    pub flushes: Vec<usize>,

    /// Embedding requests issued during the run
    pub embeddings_scheduled: usize,

    /// Outcome of the end-of-run embedding wait
    pub embeddings: DrainReport,

    /// Text rows in the full-text index after finalize
    pub fulltext_rows: usize,

    /// Wall-clock duration in seconds
    pub elapsed_secs: f64,
}
