// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the VectorStore trait.

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use mnemo_core::types::{
    blob_to_vec, l2_distance, vec_to_blob, AdapterType, HealthStatus, MemoryRecord, Neighbor,
    RecordFilter, RecordMetadata,
};
use mnemo_core::{MnemoError, PluginAdapter, VectorStore};

use crate::database::{open_database, open_in_memory, storage_err};

const RECORD_COLUMNS: &str = "text, vector, updated_at, confidence, frequency, scope";

/// Persistent vector store backed by a single SQLite file.
///
/// `replace` runs its delete and insert in one transaction.
pub struct SqliteVectorStore {
    conn: Connection,
}

impl SqliteVectorStore {
    /// Opens the database at `path`, applying migrations.
    pub async fn open(path: &str) -> Result<Self, MnemoError> {
        Ok(Self {
            conn: open_database(path).await?,
        })
    }

    /// A private in-memory database, mostly for tests.
    pub async fn in_memory() -> Result<Self, MnemoError> {
        Ok(Self {
            conn: open_in_memory().await?,
        })
    }

    /// Wraps a connection that already has the schema applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

fn missing(collection: &str) -> MnemoError {
    MnemoError::CollectionNotFound(collection.to_string())
}

fn collection_exists(conn: &rusqlite::Connection, name: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT 1 FROM collections WHERE name = ?1",
        params![name],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

fn insert_record(
    conn: &rusqlite::Connection,
    collection: &str,
    record: &MemoryRecord,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO memory_records (collection, text, vector, updated_at, confidence, frequency, scope)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            collection,
            record.text,
            vec_to_blob(&record.vector),
            record.metadata.updated_at,
            record.metadata.confidence,
            record.metadata.frequency,
            record.metadata.scope,
        ],
    )?;
    Ok(())
}

/// Deletes the records a filter selects. Filter values are bound, never
/// spliced into the statement.
fn delete_matching(
    conn: &rusqlite::Connection,
    collection: &str,
    filter: &RecordFilter,
) -> Result<usize, rusqlite::Error> {
    match filter {
        RecordFilter::TextEquals(text) => conn.execute(
            "DELETE FROM memory_records WHERE collection = ?1 AND text = ?2",
            params![collection, text],
        ),
    }
}

fn row_to_record(row: &Row<'_>) -> Result<MemoryRecord, rusqlite::Error> {
    let blob: Vec<u8> = row.get(1)?;
    Ok(MemoryRecord {
        text: row.get(0)?,
        vector: blob_to_vec(&blob),
        metadata: RecordMetadata {
            updated_at: row.get(2)?,
            confidence: row.get(3)?,
            frequency: row.get(4)?,
            scope: row.get(5)?,
        },
    })
}

fn load_records(
    conn: &rusqlite::Connection,
    collection: &str,
) -> Result<Vec<MemoryRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM memory_records WHERE collection = ?1 ORDER BY id"
    ))?;
    stmt.query_map(params![collection], row_to_record)?
        .collect::<Result<Vec<_>, _>>()
}

#[async_trait]
impl PluginAdapter for SqliteVectorStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorStore
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn collection_names(&self) -> Result<Vec<String>, MnemoError> {
        self.conn
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT name FROM collections ORDER BY name")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(storage_err)
    }

    async fn create_collection(
        &self,
        name: &str,
        seed: Vec<MemoryRecord>,
    ) -> Result<(), MnemoError> {
        let collection = name.to_string();
        let created = self
            .conn
            .call(move |conn| -> Result<bool, rusqlite::Error> {
                let tx = conn.transaction()?;
                let inserted = tx.execute(
                    "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
                    params![collection],
                )?;
                if inserted == 0 {
                    return Ok(false);
                }
                for record in &seed {
                    insert_record(&tx, &collection, record)?;
                }
                tx.commit()?;
                Ok(true)
            })
            .await
            .map_err(storage_err)?;

        if created {
            Ok(())
        } else {
            Err(MnemoError::CollectionExists(name.to_string()))
        }
    }

    async fn open_collection(&self, name: &str) -> Result<(), MnemoError> {
        let collection = name.to_string();
        let exists = self
            .conn
            .call(move |conn| -> Result<bool, rusqlite::Error> {
                collection_exists(conn, &collection)
            })
            .await
            .map_err(storage_err)?;
        if exists { Ok(()) } else { Err(missing(name)) }
    }

    async fn nearest(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<Neighbor>, MnemoError> {
        let name = collection.to_string();
        let query = vector.to_vec();
        self.conn
            .call(move |conn| -> Result<Option<Vec<Neighbor>>, rusqlite::Error> {
                if !collection_exists(conn, &name)? {
                    return Ok(None);
                }
                let mut neighbors: Vec<Neighbor> = load_records(conn, &name)?
                    .into_iter()
                    .map(|record| Neighbor {
                        distance: l2_distance(&query, &record.vector),
                        record,
                    })
                    .collect();
                neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
                neighbors.truncate(k);
                Ok(Some(neighbors))
            })
            .await
            .map_err(storage_err)?
            .ok_or_else(|| missing(collection))
    }

    async fn insert(&self, collection: &str, record: MemoryRecord) -> Result<(), MnemoError> {
        let name = collection.to_string();
        self.conn
            .call(move |conn| -> Result<Option<()>, rusqlite::Error> {
                if !collection_exists(conn, &name)? {
                    return Ok(None);
                }
                insert_record(conn, &name, &record)?;
                Ok(Some(()))
            })
            .await
            .map_err(storage_err)?
            .ok_or_else(|| missing(collection))
    }

    async fn delete(&self, collection: &str, filter: &RecordFilter) -> Result<usize, MnemoError> {
        let name = collection.to_string();
        let filter = filter.clone();
        self.conn
            .call(move |conn| -> Result<Option<usize>, rusqlite::Error> {
                if !collection_exists(conn, &name)? {
                    return Ok(None);
                }
                delete_matching(conn, &name, &filter).map(Some)
            })
            .await
            .map_err(storage_err)?
            .ok_or_else(|| missing(collection))
    }

    async fn replace(
        &self,
        collection: &str,
        filter: &RecordFilter,
        record: MemoryRecord,
    ) -> Result<(), MnemoError> {
        let name = collection.to_string();
        let filter = filter.clone();
        self.conn
            .call(move |conn| -> Result<Option<()>, rusqlite::Error> {
                let tx = conn.transaction()?;
                if !collection_exists(&tx, &name)? {
                    return Ok(None);
                }
                delete_matching(&tx, &name, &filter)?;
                insert_record(&tx, &name, &record)?;
                tx.commit()?;
                Ok(Some(()))
            })
            .await
            .map_err(storage_err)?
            .ok_or_else(|| missing(collection))
    }

    async fn records(&self, collection: &str) -> Result<Vec<MemoryRecord>, MnemoError> {
        let name = collection.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Vec<MemoryRecord>>, rusqlite::Error> {
                if !collection_exists(conn, &name)? {
                    return Ok(None);
                }
                load_records(conn, &name).map(Some)
            })
            .await
            .map_err(storage_err)?
            .ok_or_else(|| missing(collection))
    }

    async fn count(&self, collection: &str) -> Result<usize, MnemoError> {
        let name = collection.to_string();
        self.conn
            .call(move |conn| -> Result<Option<usize>, rusqlite::Error> {
                if !collection_exists(conn, &name)? {
                    return Ok(None);
                }
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM memory_records WHERE collection = ?1",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(Some(count as usize))
            })
            .await
            .map_err(storage_err)?
            .ok_or_else(|| missing(collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(text: &str, vector: Vec<f32>, frequency: u32) -> MemoryRecord {
        MemoryRecord {
            text: text.to_string(),
            vector,
            metadata: RecordMetadata {
                updated_at: "2026-03-01T12:00:00+00:00".to_string(),
                confidence: 0.75,
                frequency,
                scope: Some("global".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn sqlite_store_implements_plugin_adapter() {
        let store = SqliteVectorStore::in_memory().await.unwrap();
        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.adapter_type(), AdapterType::VectorStore);
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn open_creates_database_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/memory.db");
        SqliteVectorStore::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn record_round_trips_all_metadata() {
        let store = SqliteVectorStore::in_memory().await.unwrap();
        store.create_collection("procedural", Vec::new()).await.unwrap();
        let original = record("Use metric units", vec![0.25, -1.5, 3.0], 4);
        store.insert("procedural", original.clone()).await.unwrap();

        let records = store.records("procedural").await.unwrap();
        assert_eq!(records, vec![original]);
    }

    #[tokio::test]
    async fn create_collection_with_seed_and_duplicate() {
        let store = SqliteVectorStore::in_memory().await.unwrap();
        store
            .create_collection("semantic", vec![record("seed", vec![0.0, 0.0], 1)])
            .await
            .unwrap();
        assert_eq!(store.count("semantic").await.unwrap(), 1);

        let err = store
            .create_collection("semantic", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MnemoError::CollectionExists(_)));
        assert_eq!(store.collection_names().await.unwrap(), vec!["semantic"]);
    }

    #[tokio::test]
    async fn nearest_orders_by_l2_distance() {
        let store = SqliteVectorStore::in_memory().await.unwrap();
        store
            .create_collection(
                "semantic",
                vec![
                    record("far", vec![0.0, 4.0], 1),
                    record("near", vec![0.0, 1.0], 1),
                    record("mid", vec![0.0, 2.0], 1),
                ],
            )
            .await
            .unwrap();

        let hits = store.nearest("semantic", &[0.0, 0.0], 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.text, "near");
        assert!((hits[0].distance - 1.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn delete_escapes_single_quotes() {
        let store = SqliteVectorStore::in_memory().await.unwrap();
        store
            .create_collection(
                "semantic",
                vec![
                    record("O'Brien's dog is 'Rex'", vec![1.0], 1),
                    record("x' OR '1'='1", vec![1.0], 1),
                    record("unrelated", vec![1.0], 1),
                ],
            )
            .await
            .unwrap();

        let removed = store
            .delete(
                "semantic",
                &RecordFilter::TextEquals("O'Brien's dog is 'Rex'".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let removed = store
            .delete("semantic", &RecordFilter::TextEquals("x' OR '1'='1".to_string()))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.records("semantic").await.unwrap()[0].text, "unrelated");
    }

    #[tokio::test]
    async fn replace_swaps_record_in_place_of_match() {
        let store = SqliteVectorStore::in_memory().await.unwrap();
        store
            .create_collection("semantic", vec![record("old", vec![0.0], 2)])
            .await
            .unwrap();
        store
            .replace(
                "semantic",
                &RecordFilter::TextEquals("old".to_string()),
                record("new", vec![0.1], 3),
            )
            .await
            .unwrap();

        let records = store.records("semantic").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "new");
        assert_eq!(records[0].metadata.frequency, 3);
    }

    #[tokio::test]
    async fn missing_collection_errors() {
        let store = SqliteVectorStore::in_memory().await.unwrap();
        assert!(matches!(
            store.open_collection("semantic").await,
            Err(MnemoError::CollectionNotFound(_))
        ));
        assert!(matches!(
            store.nearest("semantic", &[0.0], 1).await,
            Err(MnemoError::CollectionNotFound(_))
        ));
        assert!(matches!(
            store
                .replace(
                    "semantic",
                    &RecordFilter::TextEquals("x".into()),
                    record("y", vec![0.0], 1)
                )
                .await,
            Err(MnemoError::CollectionNotFound(_))
        ));
    }
}
