// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deduplicating writes of findings into the long-term stores.
//!
//! Each finding is embedded and compared with its single nearest neighbour
//! in the matching collection. A neighbour closer than the threshold is the
//! same fact: it is replaced by the new record with its frequency carried
//! forward plus one. Anything else is inserted fresh with frequency 1.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use mnemo_core::traits::{EmbeddingAdapter, VectorStore};
use mnemo_core::types::{MemoryRecord, RecordFilter, RecordMetadata};
use mnemo_core::MnemoError;

use crate::types::{Finding, UpsertReport};

/// Writes findings into the semantic and procedural collections.
pub struct MemoryUpserter {
    embedder: Arc<dyn EmbeddingAdapter>,
    store: Arc<dyn VectorStore>,
    embedding_model: String,
    dimension: usize,
    threshold: f32,
}

enum Outcome {
    Inserted,
    Merged,
}

impl MemoryUpserter {
    /// `threshold` is the L2 distance below which two records are the same fact.
    pub fn new(
        embedder: Arc<dyn EmbeddingAdapter>,
        store: Arc<dyn VectorStore>,
        embedding_model: impl Into<String>,
        dimension: usize,
        threshold: f32,
    ) -> Self {
        Self {
            embedder,
            store,
            embedding_model: embedding_model.into(),
            dimension,
            threshold,
        }
    }

    /// Upserts every finding in order, stamping each with `confidence`.
    ///
    /// Not atomic across findings: the first embedding or store error stops
    /// the pass and leaves earlier writes in place.
    pub async fn upsert(
        &self,
        findings: &[Finding],
        confidence: f64,
    ) -> Result<UpsertReport, MnemoError> {
        let mut report = UpsertReport::default();
        for finding in findings {
            match self.upsert_one(finding, confidence).await? {
                Outcome::Inserted => report.inserted += 1,
                Outcome::Merged => report.merged += 1,
            }
        }
        Ok(report)
    }

    async fn upsert_one(&self, finding: &Finding, confidence: f64) -> Result<Outcome, MnemoError> {
        let collection = finding.kind().collection();
        let vector = self.embed(finding.content()).await?;

        let nearest = self
            .store
            .nearest(collection, &vector, 1)
            .await?
            .into_iter()
            .next()
            .filter(|n| n.distance < self.threshold);

        let mut record = MemoryRecord {
            text: finding.content().to_string(),
            vector,
            metadata: RecordMetadata {
                updated_at: Utc::now().to_rfc3339(),
                confidence,
                frequency: 1,
                scope: finding.scope().map(str::to_string),
            },
        };

        match nearest {
            Some(neighbor) => {
                debug!(
                    collection,
                    distance = neighbor.distance,
                    previous = %neighbor.record.text,
                    "merging with existing memory"
                );
                record.metadata.frequency = neighbor.record.metadata.frequency.saturating_add(1);
                let filter = RecordFilter::TextEquals(neighbor.record.text);
                self.store.replace(collection, &filter, record).await?;
                Ok(Outcome::Merged)
            }
            None => {
                debug!(collection, text = %record.text, "inserting new memory");
                self.store.insert(collection, record).await?;
                Ok(Outcome::Inserted)
            }
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
        let vector = self.embedder.embed(&self.embedding_model, text).await?;
        if vector.len() != self.dimension {
            return Err(MnemoError::Embedding(format!(
                "expected a {}-dimensional vector from `{}`, got {}",
                self.dimension,
                self.embedding_model,
                vector.len()
            )));
        }
        Ok(vector)
    }
}
