// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for generating a fixed-dimension embedding from text.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Embeds `text` with the named model.
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, MnemoError>;
}
