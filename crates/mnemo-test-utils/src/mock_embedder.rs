// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic embedding adapter for tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use tokio::sync::Mutex;

use mnemo_core::traits::{EmbeddingAdapter, PluginAdapter};
use mnemo_core::types::{AdapterType, HealthStatus};
use mnemo_core::MnemoError;

/// Embeds text into fixed-dimension vectors without a model server.
///
/// Texts registered with [`with_vector`](Self::with_vector) map to exactly
/// that vector. Any other text gets a pseudo-random vector derived from its
/// hash, with components in `[0, 10)`, so distinct texts land far apart and
/// identical texts embed identically.
pub struct MockEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    fail_all: bool,
    calls: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
            failing: HashSet::new(),
            fail_all: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Pin the embedding for one text. The vector may have any length,
    /// which lets tests exercise dimension checks.
    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// Fail whenever this exact text is embedded.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    /// Fail every call.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Texts embedded so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    fn hashed_vector(&self, text: &str) -> Vec<f32> {
        (0..self.dimension)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                i.hash(&mut hasher);
                (hasher.finish() % 1000) as f32 / 100.0
            })
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>, MnemoError> {
        self.calls.lock().await.push(text.to_string());

        if self.fail_all || self.failing.contains(text) {
            return Err(MnemoError::Provider {
                message: format!("embedding refused for `{text}`"),
                source: None,
            });
        }

        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.hashed_vector(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::types::l2_distance;

    #[tokio::test]
    async fn identical_text_embeds_identically() {
        let embedder = MockEmbedder::new(16);
        let a = embedder.embed("m", "likes tea").await.unwrap();
        let b = embedder.embed("m", "likes tea").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[tokio::test]
    async fn distinct_texts_land_far_apart() {
        let embedder = MockEmbedder::new(16);
        let a = embedder.embed("m", "likes tea").await.unwrap();
        let b = embedder.embed("m", "lives in Oslo").await.unwrap();
        assert!(l2_distance(&a, &b) > 1.0);
    }

    #[tokio::test]
    async fn pinned_vectors_and_failures() {
        let embedder = MockEmbedder::new(2)
            .with_vector("a", vec![1.0, 0.0])
            .failing_on("bad");
        assert_eq!(embedder.embed("m", "a").await.unwrap(), vec![1.0, 0.0]);
        assert!(embedder.embed("m", "bad").await.is_err());
        assert_eq!(embedder.calls().await, vec!["a", "bad"]);
    }
}
