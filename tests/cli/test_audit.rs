//! Tests for the audit command

use super::test_helpers::create_cli_test_services;
use crate::common::TestTree;
use filedex::cli::commands::audit::{execute, AuditArgs};
use filedex::cli::commands::index::{self, IndexArgs};
use filedex::cli::OutputFormat;

#[tokio::test]
async fn test_audit_without_database_fails() {
    let (services, _temp) = create_cli_test_services();

    let result = execute(AuditArgs { db: None }, &services, OutputFormat::Human).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("No index database"));
}

#[tokio::test]
async fn test_audit_after_index() {
    let (services, _temp) = create_cli_test_services();
    let tree = TestTree::with_files(&[("a.txt", "hello")]);

    index::execute(
        IndexArgs {
            root: tree.path().to_path_buf(),
            batch_size: None,
            db: None,
            no_embed: true,
            quiet: true,
        },
        &services,
        OutputFormat::Json,
    )
    .await
    .unwrap();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute(AuditArgs { db: None }, &services, format).await;
        assert!(result.is_ok(), "audit failed: {:?}", result.err());
    }

    let store = services.open_store().unwrap();
    let ledger = services.ledger(store);
    let processed = ledger.get("filesProcessed").unwrap().unwrap();
    assert_eq!(processed.audit_value, "1");
}
