// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators of the core.
//!
//! Service adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod completion;
pub mod embedding;
pub mod progress;
pub mod vector_store;

pub use adapter::PluginAdapter;
pub use completion::CompletionAdapter;
pub use embedding::EmbeddingAdapter;
pub use progress::ProgressSink;
pub use vector_store::VectorStore;
