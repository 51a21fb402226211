//! filedex - command-line interface for the file tree indexer
//!
//! # Examples
//!
//! ```bash
//! # Index a directory
//! filedex index ~/Documents
//!
//! # Re-index with smaller batches into a specific database
//! filedex index ~/Documents --batch-size 50 --db /tmp/docs.db
//!
//! # Show what the last run recorded
//! filedex audit
//!
//! # Show configuration
//! filedex show-config
//! ```

use clap::Parser;
use filedex::cli::{init_logging, output, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
