// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests: the deduplicating upsert against a SQLite file.

use std::sync::Arc;

use mnemo_core::VectorStore;
use mnemo_memory::{ensure_collections, Finding, MemoryUpserter, UpsertReport};
use mnemo_storage::SqliteVectorStore;
use mnemo_test_utils::MockEmbedder;
use tempfile::tempdir;

const DIM: usize = 4;

fn upserter(store: Arc<SqliteVectorStore>) -> MemoryUpserter {
    let embedder = MockEmbedder::new(DIM)
        .with_vector("Prefers tea", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("Prefers green tea", vec![1.1, 0.0, 0.0, 0.0])
        .with_vector("Owns a bicycle", vec![0.0, 0.0, 5.0, 0.0]);
    MemoryUpserter::new(Arc::new(embedder), store, "nomic-embed-text", DIM, 0.4)
}

fn semantic(content: &str) -> Finding {
    Finding::Semantic {
        content: content.to_string(),
    }
}

#[tokio::test]
async fn merges_persist_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memory.db");
    let path = path.to_str().unwrap();

    {
        let store = Arc::new(SqliteVectorStore::open(path).await.unwrap());
        ensure_collections(store.as_ref()).await.unwrap();
        let report = upserter(store.clone())
            .upsert(&[semantic("Prefers tea"), semantic("Owns a bicycle")], 0.6)
            .await
            .unwrap();
        assert_eq!(report, UpsertReport { inserted: 2, merged: 0 });
    }

    let store = Arc::new(SqliteVectorStore::open(path).await.unwrap());
    ensure_collections(store.as_ref()).await.unwrap();
    let report = upserter(store.clone())
        .upsert(&[semantic("Prefers green tea")], 0.9)
        .await
        .unwrap();
    assert_eq!(report, UpsertReport { inserted: 0, merged: 1 });

    let records = store.records("semantic").await.unwrap();
    let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["Owns a bicycle", "Prefers green tea"]);
    let merged = &records[1];
    assert_eq!(merged.metadata.frequency, 2);
    assert!((merged.metadata.confidence - 0.9).abs() < f64::EPSILON);
    assert_eq!(merged.vector, vec![1.1, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn procedural_scope_is_stored() {
    let store = Arc::new(SqliteVectorStore::in_memory().await.unwrap());
    ensure_collections(store.as_ref()).await.unwrap();

    upserter(store.clone())
        .upsert(
            &[Finding::Procedural {
                content: "Prefers tea".to_string(),
                scope: "beverages".to_string(),
            }],
            0.5,
        )
        .await
        .unwrap();

    let records = store.records("procedural").await.unwrap();
    assert_eq!(records[0].metadata.scope.as_deref(), Some("beverages"));
    assert_eq!(store.count("semantic").await.unwrap(), 0);
}

#[tokio::test]
async fn merge_replaces_text_containing_nul_and_quotes() {
    let store = Arc::new(SqliteVectorStore::in_memory().await.unwrap());
    ensure_collections(store.as_ref()).await.unwrap();
    let embedder = MockEmbedder::new(DIM)
        .with_vector("a\0b 'quoted'", vec![2.0, 0.0, 0.0, 0.0])
        .with_vector("a b 'quoted'", vec![2.1, 0.0, 0.0, 0.0]);
    let upserter = MemoryUpserter::new(
        Arc::new(embedder),
        store.clone(),
        "nomic-embed-text",
        DIM,
        0.4,
    );

    upserter
        .upsert(&[semantic("a\0b 'quoted'")], 0.5)
        .await
        .unwrap();
    let report = upserter
        .upsert(&[semantic("a b 'quoted'")], 0.7)
        .await
        .unwrap();
    assert_eq!(report, UpsertReport { inserted: 0, merged: 1 });

    let records = store.records("semantic").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "a b 'quoted'");
    assert_eq!(records[0].metadata.frequency, 2);
}
