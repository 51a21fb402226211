//! CLI adapter for filedex
//!
//! Provides the command-line interface over the core indexer.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     core/        |
//! |  (domain logic)  |
//! +--------+---------+
//!          |
//!          v
//! +------------------+
//! |      cli/        |
//! | (clap adapter)   |
//! +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// filedex - Incremental file tree indexer
///
/// Walks a directory, fingerprints every file, and keeps one
/// versioned record per path in a SQLite database, with optional
/// embeddings and full-text search over text excerpts.
#[derive(Parser, Debug)]
#[command(name = "filedex")]
#[command(version)]
#[command(about = "Incremental file tree indexer", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a directory tree
    Index(commands::IndexArgs),

    /// Show run bookkeeping recorded in the database
    Audit(commands::AuditArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  filedex completions bash > ~/.local/share/bash-completion/completions/filedex
    ///   zsh:   filedex completions zsh > ~/.zfunc/_filedex
    ///   fish:  filedex completions fish > ~/.config/fish/completions/filedex.fish
    Completions(commands::CompletionsArgs),
}

impl Cli {
    /// Default log filter for this invocation
    pub fn log_filter(&self) -> &'static str {
        match &self.command {
            Commands::Index(args) if args.quiet => "filedex=warn",
            _ => "filedex=info",
        }
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` overrides the default filter. Logs go to stderr so
/// stdout carries only command output; with `--format json` the log
/// lines are JSON as well.
pub fn init_logging(cli: &Cli) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_filter().into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match cli.format {
        OutputFormat::Json => builder.json().try_init(),
        OutputFormat::Human => builder.compact().try_init(),
    };
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();

    let mut config = Config::load_with_xdg(&xdg)?;
    match &cli.command {
        Commands::Index(args) => args.apply_overrides(&mut config),
        Commands::Audit(args) => args.apply_overrides(&mut config),
        _ => {}
    }
    config.validate()?;

    let services = Arc::new(Services::new(config));

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format).await,
        Commands::Audit(args) => commands::audit::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
