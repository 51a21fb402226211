//! Embedding gateway.
//!
//! Turns a file into a fixed-length vector through an external
//! capability, and schedules those calls so they never hold up the
//! indexing loop.
//!
//! # Architecture
//!
//! - **Embedder**: async trait implemented by every backend
//! - **CommandEmbedder**: runs an external program per file
//! - **EmbeddingScheduler**: fire-and-forget tasks with a bounded
//!   end-of-run drain

mod command;
mod scheduler;

pub use command::{parse_vector, CommandEmbedder};
pub use scheduler::EmbeddingScheduler;

use async_trait::async_trait;
use std::path::Path;

use crate::core::error::Result;

/// A backend producing one vector per file
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Compute the embedding for the file at `path`
    async fn embed(&self, path: &Path) -> Result<Vec<f32>>;
}
