//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub config_file_exists: bool,
    pub indexing: IndexingView,
    pub storage: StorageView,
    pub embedding: EmbeddingView,
}

#[derive(Debug, Serialize)]
pub struct IndexingView {
    pub batch_size: usize,
    pub flush_retries: usize,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StorageView {
    pub db_path: String,
    pub audit_checkpoint: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbeddingView {
    pub enabled: bool,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub dimensions: usize,
    pub timeout_secs: u64,
    pub drain_timeout_secs: u64,
    pub max_concurrency: usize,
}

/// Execute the config command
pub async fn execute(
    _args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let config_file = crate::core::xdg::XdgDirs::new().config_file();

    let response = ConfigResponse {
        config_file: config_file.to_string_lossy().into_owned(),
        config_file_exists: config_file.exists(),
        indexing: IndexingView {
            batch_size: config.indexing.batch_size,
            flush_retries: config.indexing.flush_retries,
            exclude_patterns: config.indexing.exclude_patterns.clone(),
        },
        storage: StorageView {
            db_path: config.storage.db_path.to_string_lossy().into_owned(),
            audit_checkpoint: config.storage.audit_checkpoint,
        },
        embedding: EmbeddingView {
            enabled: config.embedding.is_enabled(),
            command: config.embedding.command.clone(),
            args: config.embedding.args.clone(),
            dimensions: config.embedding.dimensions,
            timeout_secs: config.embedding.timeout_secs,
            drain_timeout_secs: config.embedding.drain_timeout_secs,
            max_concurrency: config.embedding.max_concurrency,
        },
    };

    match format {
        OutputFormat::Human => {
            let file_note = if response.config_file_exists {
                ""
            } else {
                " (not found, using defaults)"
            };
            println!("Configuration:");
            println!("  config_file: {}{}", response.config_file, file_note);
            println!("  indexing:");
            println!("    batch_size: {}", response.indexing.batch_size);
            println!("    flush_retries: {}", response.indexing.flush_retries);
            println!(
                "    exclude_patterns: {:?}",
                response.indexing.exclude_patterns
            );
            println!("  storage:");
            println!("    db_path: {}", response.storage.db_path);
            println!(
                "    audit_checkpoint: {}",
                response.storage.audit_checkpoint
            );
            println!("  embedding:");
            match &response.embedding.command {
                Some(command) if response.embedding.enabled => {
                    println!("    command: {} {:?}", command, response.embedding.args);
                    println!("    dimensions: {}", response.embedding.dimensions);
                    println!("    timeout_secs: {}", response.embedding.timeout_secs);
                    println!(
                        "    drain_timeout_secs: {}",
                        response.embedding.drain_timeout_secs
                    );
                    println!(
                        "    max_concurrency: {}",
                        response.embedding.max_concurrency
                    );
                }
                _ => println!("    disabled"),
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
