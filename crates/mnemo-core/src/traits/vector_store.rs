// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector store trait for the long-term memory collections.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MemoryRecord, Neighbor, RecordFilter};

/// A store of named collections of embedding-indexed records.
///
/// Distances are Euclidean (L2); lower is closer.
#[async_trait]
pub trait VectorStore: PluginAdapter {
    /// Names of all existing collections.
    async fn collection_names(&self) -> Result<Vec<String>, MnemoError>;

    /// Creates a collection populated with `seed`.
    ///
    /// Fails with [`MnemoError::CollectionExists`] if the name is taken.
    async fn create_collection(
        &self,
        name: &str,
        seed: Vec<MemoryRecord>,
    ) -> Result<(), MnemoError>;

    /// Verifies that a collection exists and is usable.
    async fn open_collection(&self, name: &str) -> Result<(), MnemoError>;

    /// Returns up to `k` records ordered by ascending distance from `vector`.
    async fn nearest(
        &self,
        collection: &str,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<Neighbor>, MnemoError>;

    /// Appends a record to a collection.
    async fn insert(&self, collection: &str, record: MemoryRecord) -> Result<(), MnemoError>;

    /// Deletes every record matching `filter`, returning how many were removed.
    async fn delete(&self, collection: &str, filter: &RecordFilter) -> Result<usize, MnemoError>;

    /// Deletes records matching `filter` and inserts `record` in their place.
    ///
    /// The default runs [`delete`](Self::delete) then [`insert`](Self::insert),
    /// so a concurrent reader can briefly observe neither record. Stores
    /// able to do both in one step override this.
    async fn replace(
        &self,
        collection: &str,
        filter: &RecordFilter,
        record: MemoryRecord,
    ) -> Result<(), MnemoError> {
        self.delete(collection, filter).await?;
        self.insert(collection, record).await
    }

    /// All records of a collection, in insertion order.
    async fn records(&self, collection: &str) -> Result<Vec<MemoryRecord>, MnemoError>;

    /// Number of records in a collection.
    async fn count(&self, collection: &str) -> Result<usize, MnemoError> {
        Ok(self.records(collection).await?.len())
    }
}
