//! Index command - index a directory tree

use crate::cli::output::{colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::types::RunSummary;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Directory to index
    pub root: PathBuf,

    /// Records committed per transaction
    #[arg(long, short = 'b')]
    pub batch_size: Option<usize>,

    /// Database file (overrides configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Skip embedding generation for this run
    #[arg(long)]
    pub no_embed: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl IndexArgs {
    /// Apply command-line overrides on top of loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(batch_size) = self.batch_size {
            config.indexing.batch_size = batch_size;
        }
        if let Some(db) = &self.db {
            config.storage.db_path = db.clone();
        }
        if self.no_embed {
            config.embedding.command = None;
        }
    }
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Indexing {} into {}...",
            colors::file_path(&args.root.display().to_string()),
            colors::file_path(&services.config.storage.db_path.display().to_string())
        );
    }

    let summary = services.index_root(&args.root).await?;

    match format {
        OutputFormat::Human => print_summary(&summary),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} {} in {}",
        colors::success("Indexed"),
        colors::file_path(&summary.root.display().to_string()),
        colors::number(&format_duration(summary.elapsed_secs))
    );
    println!(
        "  {} {}  {} {}  {} {}",
        colors::label("processed:"),
        colors::number(&summary.processed.to_string()),
        colors::label("skipped:"),
        colors::number(&summary.skipped.to_string()),
        colors::label("failed:"),
        colors::number(&summary.failed.to_string())
    );
    println!(
        "  {} {}  {} {}",
        colors::label("flushes:"),
        colors::number(&summary.flushes.len().to_string()),
        colors::label("full-text rows:"),
        colors::number(&summary.fulltext_rows.to_string())
    );

    if summary.embeddings_scheduled > 0 {
        let e = &summary.embeddings;
        println!(
            "  {} {} scheduled, {} written, {} failed, {} abandoned",
            colors::label("embeddings:"),
            colors::number(&summary.embeddings_scheduled.to_string()),
            colors::number(&e.written.to_string()),
            colors::number(&e.failed.to_string()),
            colors::number(&e.abandoned.to_string())
        );
    }
}
