//! External-program embedder.
//!
//! The program is invoked as `<command> <args...> <path>` and must
//! print a JSON array of numbers on stdout.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::Embedder;
use crate::core::config::EmbeddingConfig;
use crate::core::error::{FiledexError, Result};

/// Embedder backed by an external command
#[derive(Debug, Clone)]
pub struct CommandEmbedder {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandEmbedder {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Build from configuration; `None` when embeddings are disabled
    pub fn from_config(config: &EmbeddingConfig) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }

        let program = config.command.as_deref()?.trim().to_string();
        Some(Self::new(
            program,
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }
}

#[async_trait]
impl Embedder for CommandEmbedder {
    async fn embed(&self, path: &Path) -> Result<Vec<f32>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                FiledexError::Embedding(format!(
                    "'{}' timed out after {}s",
                    self.program,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| FiledexError::Embedding(format!("Failed to run '{}': {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FiledexError::Embedding(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        parse_vector(&output.stdout)
    }
}

/// Parse a JSON float array
pub fn parse_vector(stdout: &[u8]) -> Result<Vec<f32>> {
    let vector: Vec<f32> = serde_json::from_slice(stdout)?;
    if vector.is_empty() {
        return Err(FiledexError::Embedding(
            "Embedding command returned an empty vector".to_string(),
        ));
    }
    Ok(vector)
}
