// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mnemo conversational memory engine.
//!
//! This crate provides the trait definitions for the external services the
//! engine talks to (completion, embedding, vector store), the shared error
//! type, and the wire types passed between crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MnemoError;
pub use types::{
    AdapterType, ChatMessage, ChatRequest, ChatResponse, HealthStatus, MemoryRecord, Neighbor,
    RecordFilter, RecordMetadata, Role, TokenLogprob, TopLogprob,
};

pub use traits::{CompletionAdapter, EmbeddingAdapter, PluginAdapter, ProgressSink, VectorStore};
