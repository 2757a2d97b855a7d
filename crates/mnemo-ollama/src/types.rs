// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama native API request/response types.

use mnemo_core::types::{ChatMessage, ResponseFormat, TokenLogprob};
use serde::{Deserialize, Serialize};

// --- Chat ---

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    /// Always `false`; replies are read in one piece.
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub logprobs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u8>,
}

/// Sampling options nested under `options`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Non-streamed `/api/chat` reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub model: String,
    pub message: ReplyMessage,
    /// Per-token log-probabilities, when requested.
    #[serde(default)]
    pub logprobs: Option<Vec<TokenLogprob>>,
}

/// The assistant message inside a [`ChatReply`].
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: String,
    /// Some server builds nest the log-probabilities here instead.
    #[serde(default)]
    pub content_logprobs: Option<Vec<TokenLogprob>>,
}

// --- Embeddings ---

/// Body of `POST /api/embed`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedBody<'a> {
    pub model: &'a str,
    pub input: &'a str,
}

/// `/api/embed` reply: one vector per input.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedReply {
    #[serde(default)]
    pub embeddings: Vec<Vec<f32>>,
}

// --- Errors ---

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
