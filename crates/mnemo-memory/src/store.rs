// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local vector store and collection bootstrap.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use mnemo_core::traits::{PluginAdapter, VectorStore};
use mnemo_core::types::{
    l2_distance, AdapterType, HealthStatus, MemoryRecord, Neighbor, RecordFilter,
};
use mnemo_core::MnemoError;

use crate::types::MemoryKind;

/// Creates the semantic and procedural collections if missing, and opens
/// them otherwise. New collections start empty.
pub async fn ensure_collections(store: &dyn VectorStore) -> Result<(), MnemoError> {
    let existing = store.collection_names().await?;
    for kind in MemoryKind::ALL {
        let name = kind.collection();
        if existing.iter().any(|n| n == name) {
            store.open_collection(name).await?;
        } else {
            info!(collection = name, "creating collection");
            store.create_collection(name, Vec::new()).await?;
        }
    }
    Ok(())
}

/// Vector store held entirely in memory. Lost on restart.
///
/// Nearest-neighbour search is a linear scan.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Vec<MemoryRecord>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(collection: &str) -> MnemoError {
    MnemoError::CollectionNotFound(collection.to_string())
}

#[async_trait]
impl PluginAdapter for InMemoryVectorStore {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorStore
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn collection_names(&self) -> Result<Vec<String>, MnemoError> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_collection(
        &self,
        name: &str,
        seed: Vec<MemoryRecord>,
    ) -> Result<(), MnemoError> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(MnemoError::CollectionExists(name.to_string()));
        }
        collections.insert(name.to_string(), seed);
        Ok(())
    }

    async fn open_collection(&self, name: &str) -> Result<(), MnemoError> {
        if self.collections.read().await.contains_key(name) {
            Ok(())
        } else {
            Err(missing(name))
        }
    }

    async fn nearest(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<Neighbor>, MnemoError> {
        let collections = self.collections.read().await;
        let records = collections.get(collection).ok_or_else(|| missing(collection))?;

        let mut neighbors: Vec<Neighbor> = records
            .iter()
            .map(|record| Neighbor {
                distance: l2_distance(vector, &record.vector),
                record: record.clone(),
            })
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    async fn insert(&self, collection: &str, record: MemoryRecord) -> Result<(), MnemoError> {
        self.collections
            .write()
            .await
            .get_mut(collection)
            .ok_or_else(|| missing(collection))?
            .push(record);
        Ok(())
    }

    async fn delete(&self, collection: &str, filter: &RecordFilter) -> Result<usize, MnemoError> {
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| missing(collection))?;
        let before = records.len();
        records.retain(|r| !filter.matches(r));
        Ok(before - records.len())
    }

    async fn replace(
        &self,
        collection: &str,
        filter: &RecordFilter,
        record: MemoryRecord,
    ) -> Result<(), MnemoError> {
        // Single write guard: readers never see the gap between delete and insert.
        let mut collections = self.collections.write().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| missing(collection))?;
        records.retain(|r| !filter.matches(r));
        records.push(record);
        Ok(())
    }

    async fn records(&self, collection: &str) -> Result<Vec<MemoryRecord>, MnemoError> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .ok_or_else(|| missing(collection))
    }

    async fn count(&self, collection: &str) -> Result<usize, MnemoError> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .ok_or_else(|| missing(collection))
    }
}
