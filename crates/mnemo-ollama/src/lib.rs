// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama adapter for the Mnemo memory engine.
//!
//! One [`OllamaProvider`] serves both roles the core needs from a model
//! server: chat completion (with optional JSON output and token
//! log-probabilities) and text embeddings.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use mnemo_config::model::OllamaConfig;
use mnemo_core::error::MnemoError;
use mnemo_core::traits::{CompletionAdapter, EmbeddingAdapter, PluginAdapter};
use mnemo_core::types::{AdapterType, ChatRequest, ChatResponse, HealthStatus};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::OllamaClient;
use crate::types::{ChatBody, ChatOptions, ChatReply, EmbedBody, EmbedReply};

/// Ollama provider implementing [`CompletionAdapter`] and [`EmbeddingAdapter`].
pub struct OllamaProvider {
    client: OllamaClient,
}

impl OllamaProvider {
    /// Creates a provider from the `[ollama]` section.
    pub fn new(config: &OllamaConfig) -> Result<Self, MnemoError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let client = OllamaClient::new(&config.base_url, timeout)?;
        info!(base_url = client.base_url(), "Ollama provider initialized");
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        match self.client.get_json::<Value>("/api/tags").await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl CompletionAdapter for OllamaProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, MnemoError> {
        let body = ChatBody {
            model: &request.model,
            messages: &request.messages,
            stream: false,
            format: request.format,
            options: request
                .temperature
                .map(|t| ChatOptions { temperature: Some(t) }),
            logprobs: request.logprobs,
            top_logprobs: request.logprobs.then_some(request.top_logprobs).flatten(),
        };
        debug!(model = %request.model, messages = request.messages.len(), "sending chat request");

        let reply: ChatReply = self.client.post_json("/api/chat", &body).await?;
        let logprobs = if request.logprobs {
            reply.logprobs.or(reply.message.content_logprobs)
        } else {
            None
        };

        Ok(ChatResponse {
            content: reply.message.content,
            model: if reply.model.is_empty() {
                request.model
            } else {
                reply.model
            },
            logprobs,
        })
    }
}

#[async_trait]
impl EmbeddingAdapter for OllamaProvider {
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, MnemoError> {
        let body = EmbedBody { model, input: text };
        let reply: EmbedReply = self.client.post_json("/api/embed", &body).await?;
        match reply.embeddings.into_iter().next() {
            Some(vector) if !vector.is_empty() => Ok(vector),
            _ => Err(MnemoError::Embedding(format!(
                "model {model} returned no embedding"
            ))),
        }
    }
}
