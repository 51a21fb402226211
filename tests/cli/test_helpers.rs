//! CLI test helpers
//!
//! Arc<Services> wrappers matching CLI execute() signatures.

use crate::common::test_config;
use filedex::core::services::Services;
use std::sync::Arc;
use tempfile::TempDir;

/// Create test services wrapped in Arc (matching CLI execute() signatures)
pub fn create_cli_test_services() -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&temp_dir);

    let services = Arc::new(Services::new(config));
    (services, temp_dir)
}
