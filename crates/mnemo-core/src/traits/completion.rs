// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter trait for chat-style language model services.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatRequest, ChatResponse};

/// Adapter for an opaque chat completion service.
///
/// Used for intent classification, conversational replies, research
/// reports, and memory mining (JSON output with token log-probabilities).
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends a chat request and returns the full, non-streamed response.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, MnemoError>;
}
