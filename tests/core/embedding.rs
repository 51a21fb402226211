// Embedding integration tests

use crate::common::{index_tree, MockEmbedder, TestTree};
use filedex::core::storage::Store;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::test]
async fn test_vectors_written_for_new_files() {
    let tree = TestTree::with_files(&[("a.txt", "alpha"), ("b.txt", "beta")]);
    let store = Arc::new(Store::open_in_memory().unwrap());
    let embedder = MockEmbedder::new(4);

    let summary = index_tree(store.clone(), tree.path(), 10, Some(embedder.clone())).await;

    assert_eq!(summary.embeddings_scheduled, 2);
    assert_eq!(summary.embeddings.written, 2);

    let path = PathBuf::from(tree.stored_path("a.txt"));
    let record = store
        .get_file_by_path(&tree.stored_path("a.txt"))
        .unwrap()
        .unwrap();
    let stored = store.get_vector(record.id).unwrap().unwrap();
    let expected = embedder.vector_for(&path);
    let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&stored), bits(&expected));
}

#[tokio::test]
async fn test_existing_vector_suppresses_request() {
    let tree = TestTree::with_files(&[("a.txt", "alpha")]);
    let store = Arc::new(Store::open_in_memory().unwrap());
    let embedder = MockEmbedder::new(4);

    index_tree(store.clone(), tree.path(), 10, Some(embedder.clone())).await;
    let second = index_tree(store.clone(), tree.path(), 10, Some(embedder.clone())).await;

    assert_eq!(second.skipped, 1);
    assert_eq!(second.embeddings_scheduled, 0);
    assert_eq!(embedder.calls(), 1);
}

#[tokio::test]
async fn test_failed_embedding_does_not_roll_back_record() {
    let tree = TestTree::with_files(&[("fail-me.txt", "refused"), ("ok.txt", "fine")]);
    let store = Arc::new(Store::open_in_memory().unwrap());
    let embedder = MockEmbedder::new(4);

    let summary = index_tree(store.clone(), tree.path(), 10, Some(embedder.clone())).await;
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.embeddings.failed, 1);
    assert_eq!(summary.embeddings.written, 1);

    let failed = store
        .get_file_by_path(&tree.stored_path("fail-me.txt"))
        .unwrap()
        .unwrap();
    assert!(!store.has_vector(failed.id).unwrap());

    // Vectorless rows are retried on the next scan
    let again = index_tree(store.clone(), tree.path(), 10, Some(embedder.clone())).await;
    assert_eq!(again.embeddings_scheduled, 1);
    let path = PathBuf::from(tree.stored_path("fail-me.txt"));
    assert_eq!(embedder.calls_for(&path), 2);
}

#[tokio::test]
async fn test_nearest_neighbours_after_indexing() {
    let tree = TestTree::with_files(&[("a.txt", "a"), ("bb.txt", "bb"), ("cccccc.txt", "c")]);
    let store = Arc::new(Store::open_in_memory().unwrap());
    let embedder = MockEmbedder::new(4);

    index_tree(store.clone(), tree.path(), 10, Some(embedder.clone())).await;

    let target = PathBuf::from(tree.stored_path("bb.txt"));
    let query = embedder.vector_for(&target);
    let hits = store.nearest(&query, 3).unwrap();
    assert_eq!(hits.len(), 3);

    let closest = store.get_file(hits[0].id).unwrap().unwrap();
    assert_eq!(closest.file_name, "bb.txt");
    assert_eq!(hits[0].distance, 0.0);
    assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
}
