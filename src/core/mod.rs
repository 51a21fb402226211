//! Core domain logic
//!
//! Everything the indexer does, independent of the command-line
//! front end.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **storage**: SQLite store, schema, vectors, audit ledger
//! - **indexer**: Walking, classification, batching, orchestration
//! - **embedding**: Embedding backends and task scheduling
//! - **services**: Unified service container

pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod services;
pub mod storage;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{FiledexError, Result};
pub use services::Services;
