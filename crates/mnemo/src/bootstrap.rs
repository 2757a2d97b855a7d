// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires adapters, store and agent from configuration.

use std::sync::Arc;

use tracing::info;

use mnemo_agent::Agent;
use mnemo_config::model::{MemoryConfig, MnemoConfig, StoreBackend};
use mnemo_core::traits::VectorStore;
use mnemo_core::MnemoError;
use mnemo_memory::{ensure_collections, InMemoryVectorStore};
use mnemo_ollama::OllamaProvider;
use mnemo_storage::SqliteVectorStore;

/// Opens the configured backend and makes sure both memory collections exist.
pub async fn open_store(memory: &MemoryConfig) -> Result<Arc<dyn VectorStore>, MnemoError> {
    let store: Arc<dyn VectorStore> = match memory.backend {
        StoreBackend::Sqlite => {
            info!(path = memory.database_path.as_str(), "opening memory database");
            Arc::new(SqliteVectorStore::open(&memory.database_path).await?)
        }
        StoreBackend::InMemory => {
            info!("using in-memory store, memories will not survive a restart");
            Arc::new(InMemoryVectorStore::new())
        }
    };
    ensure_collections(store.as_ref()).await?;
    Ok(store)
}

/// Builds an [`Agent`] backed by Ollama for chat and embeddings.
pub async fn build_agent(config: &MnemoConfig) -> Result<Agent, MnemoError> {
    let provider = Arc::new(OllamaProvider::new(&config.ollama)?);
    let store = open_store(&config.memory).await?;
    Ok(Agent::from_config(config, provider.clone(), provider, store))
}
