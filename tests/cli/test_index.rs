//! Tests for the index command

use super::test_helpers::create_cli_test_services;
use crate::common::TestTree;
use filedex::cli::commands::index::{execute, IndexArgs};
use filedex::cli::OutputFormat;
use std::path::PathBuf;

fn args(root: PathBuf) -> IndexArgs {
    IndexArgs {
        root,
        batch_size: None,
        db: None,
        no_embed: true,
        quiet: true,
    }
}

#[tokio::test]
async fn test_index_command_human() {
    let (services, _temp) = create_cli_test_services();
    let tree = TestTree::with_files(&[("a.txt", "hello"), ("b.md", "# b")]);

    let result = execute(args(tree.path().to_path_buf()), &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "index failed: {:?}", result.err());

    let store = services.open_store().unwrap();
    assert_eq!(store.count_files().unwrap(), 2);
}

#[tokio::test]
async fn test_index_command_json_twice() {
    let (services, _temp) = create_cli_test_services();
    let tree = TestTree::with_files(&[("a.txt", "hello")]);

    execute(args(tree.path().to_path_buf()), &services, OutputFormat::Json)
        .await
        .unwrap();
    execute(args(tree.path().to_path_buf()), &services, OutputFormat::Json)
        .await
        .unwrap();

    let store = services.open_store().unwrap();
    let record = store
        .get_file_by_path(&tree.stored_path("a.txt"))
        .unwrap()
        .unwrap();
    assert_eq!(record.update_ident, 1);
}

#[tokio::test]
async fn test_index_command_missing_root_fails_before_store() {
    let (services, temp) = create_cli_test_services();

    let result = execute(args(temp.path().join("missing")), &services, OutputFormat::Human).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Invalid path"));
    assert!(!services.config.storage.db_path.exists());
}

#[tokio::test]
async fn test_index_command_rejects_file_root() {
    let (services, _temp) = create_cli_test_services();
    let tree = TestTree::with_files(&[("single.txt", "x")]);

    let result = execute(args(tree.path().join("single.txt")), &services, OutputFormat::Human).await;
    assert!(result.is_err());
}
