//! Audit command - show run bookkeeping

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::types::AuditEntry;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Database file (overrides configuration)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

impl AuditArgs {
    /// Apply command-line overrides on top of loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.storage.db_path = db.clone();
        }
    }
}

/// Audit listing response
#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub database: String,
    pub files: usize,
    pub entries: Vec<AuditEntry>,
}

/// Execute the audit command
pub async fn execute(
    _args: AuditArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = &services.config.storage.db_path;
    if !db_path.exists() {
        return Err(format!(
            "No index database at '{}'. Run 'filedex index <ROOT>' first.",
            db_path.display()
        )
        .into());
    }

    let store = services.open_store()?;
    let ledger = services.ledger(Arc::clone(&store));

    let response = AuditResponse {
        database: db_path.to_string_lossy().into_owned(),
        files: store.count_files()?,
        entries: ledger.entries()?,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} ({} files)",
                colors::label("Database:"),
                colors::file_path(&response.database),
                colors::number(&response.files.to_string())
            );
            if response.entries.is_empty() {
                println!("{}", colors::dim("No runs recorded"));
            }
            let width = response
                .entries
                .iter()
                .map(|e| e.audit_key.len())
                .max()
                .unwrap_or(0);
            for entry in &response.entries {
                println!(
                    "  {:<width$}  {}  {}",
                    entry.audit_key,
                    entry.audit_value,
                    colors::dim(&format!("v{}", entry.update_ident)),
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
