//! File indexing module.
//!
//! Turns a directory tree into persisted file records. Key pieces:
//!
//! - Lazy tree walking with fixed ignore lists and glob exclusions
//! - Single-pass content classification (SHA-256 + text/binary)
//! - Bounded batch commits with retry-safe queues
//! - Run orchestration with audit bookkeeping

pub mod batch;
pub mod classifier;
pub mod pipeline;
pub mod walker;

pub use batch::BatchWriter;
pub use pipeline::{validate_root, IndexingPipeline, RunState};
pub use walker::FileWalker;
