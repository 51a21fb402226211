//! filedex - Incremental File Tree Indexer
//!
//! Walks a directory tree, classifies every file in a single
//! streaming pass (SHA-256 digest, text/binary, short excerpt), and
//! persists one record per path in SQLite. Records are committed in
//! bounded batches, re-scans bump a per-record version instead of
//! duplicating rows, and an optional embedding backend attaches one
//! vector per file.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - storage (SQLite store, FTS5 index, vectors, audit ledger)
//!   - indexer (walker, classifier, batch writer, pipeline)
//!   - embedding (backends and scheduler)
//!   - services (unified service container)
//!
//! - **cli**: clap adapter (depends on core)

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use crate::core::config::Config;
pub use crate::core::error::{FiledexError, Result};
pub use crate::core::services::Services;
pub use crate::core::storage::{AuditLedger, Store};
pub use crate::core::types::*;
