//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod audit;
pub mod completions;
pub mod config;
pub mod index;

// Re-export argument types for use in mod.rs
pub use audit::AuditArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use index::IndexArgs;
