// Storage integration tests

use crate::common::{index_tree, TestTree};
use filedex::core::error::FiledexError;
use filedex::core::indexer::BatchWriter;
use filedex::core::storage::Store;
use filedex::core::types::PendingRecord;
use std::sync::Arc;
use tempfile::TempDir;

fn record(path: &str, content: &str) -> PendingRecord {
    PendingRecord {
        file_name: path.rsplit('/').next().unwrap().to_string(),
        full_path: path.to_string(),
        file_format: "txt".to_string(),
        file_size: content.len() as u64,
        is_text_file: true,
        content: content.to_string(),
        content_hash: "ef".repeat(32),
        indexed_at: "2025-03-01T10:00:00.000Z".to_string(),
        created_at: "2025-03-01T10:00:00.000Z".to_string(),
        modified_at: "2025-03-01T10:00:00.000Z".to_string(),
    }
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let tree = TestTree::with_files(&[("a.txt", "persist me")]);
    let db_dir = TempDir::new().unwrap();
    let db = db_dir.path().join("index.db");

    {
        let store = Arc::new(Store::open(&db).unwrap());
        index_tree(store, tree.path(), 10, None).await;
    }

    let store = Store::open(&db).unwrap();
    let record = store
        .get_file_by_path(&tree.stored_path("a.txt"))
        .unwrap()
        .unwrap();
    assert_eq!(record.content, "persist me");
    assert_eq!(store.search_content("persist", 5).unwrap().len(), 1);
}

#[test]
fn test_failed_flush_keeps_queue_intact() {
    let db_dir = TempDir::new().unwrap();
    let db = db_dir.path().join("index.db");
    let store = Arc::new(Store::open(&db).unwrap());

    // A second connection installs a trigger that aborts any insert of "/r/poison"
    let side = rusqlite::Connection::open(&db).unwrap();
    side.execute_batch(
        "CREATE TRIGGER poison BEFORE INSERT ON files
         WHEN new.fullPath = '/r/poison'
         BEGIN SELECT RAISE(ABORT, 'poisoned row'); END;",
    )
    .unwrap();

    let mut writer = BatchWriter::new(store.clone(), 3, None);
    writer.enqueue(record("/r/one", "1")).unwrap();
    writer.enqueue(record("/r/poison", "2")).unwrap();
    let err = writer.enqueue(record("/r/three", "3")).unwrap_err();

    assert!(matches!(err, FiledexError::FlushFailed(ref m) if m.contains("poisoned row")));
    assert_eq!(writer.queued(), 3);
    assert_eq!(writer.processed(), 0);
    assert_eq!(store.count_files().unwrap(), 0);

    side.execute_batch("DROP TRIGGER poison;").unwrap();
    let report = writer.flush().unwrap();
    assert_eq!(report.inserted, 3);
    assert_eq!(writer.flush_sizes(), &[3]);
    assert_eq!(store.count_files().unwrap(), 3);
}

#[test]
fn test_fulltext_ignores_binary_rows() {
    let store = Store::open_in_memory().unwrap();
    let mut binary = record("/r/image.bin", "");
    binary.is_text_file = false;
    store
        .commit_batch(&[record("/r/plan.md", "roadmap milestones"), binary])
        .unwrap();

    assert_eq!(store.rebuild_fulltext().unwrap(), 1);
    let hits = store.search_content("milestones", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].file_name, "plan.md");
}

#[test]
fn test_text_to_binary_transition_leaves_fulltext() {
    let store = Store::open_in_memory().unwrap();
    store
        .commit_batch(&[record("/r/flip.dat", "searchable words")])
        .unwrap();
    assert_eq!(store.search_content("searchable", 10).unwrap().len(), 1);

    let mut now_binary = record("/r/flip.dat", "");
    now_binary.is_text_file = false;
    store.commit_batch(&[now_binary]).unwrap();

    assert!(store.search_content("searchable", 10).unwrap().is_empty());
}
