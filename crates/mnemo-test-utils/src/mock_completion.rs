// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion adapter for deterministic testing.
//!
//! `MockCompletion` implements `CompletionAdapter` with scripted replies,
//! enabling fast, CI-runnable tests without a model server.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mnemo_core::traits::{CompletionAdapter, PluginAdapter};
use mnemo_core::types::{
    AdapterType, ChatRequest, ChatResponse, HealthStatus, TokenLogprob, TopLogprob,
};
use mnemo_core::MnemoError;

/// One scripted answer from the mock.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Plain text with no log-probabilities.
    Text(String),
    /// Content plus the token log-probability stream that produced it.
    WithLogprobs {
        content: String,
        logprobs: Vec<TokenLogprob>,
    },
    /// The call fails with a provider error carrying this message.
    Fail(String),
}

impl ScriptedReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn with_logprobs(content: impl Into<String>, logprobs: Vec<TokenLogprob>) -> Self {
        Self::WithLogprobs {
            content: content.into(),
            logprobs,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// A generated token with no ranked alternatives.
pub fn token(text: &str, probability: f64) -> TokenLogprob {
    TokenLogprob {
        token: text.to_string(),
        logprob: probability.ln(),
        top_logprobs: Vec::new(),
    }
}

/// A generated token with ranked alternatives, given as probabilities.
pub fn token_with_alternatives(
    text: &str,
    probability: f64,
    alternatives: &[(&str, f64)],
) -> TokenLogprob {
    TokenLogprob {
        token: text.to_string(),
        logprob: probability.ln(),
        top_logprobs: alternatives
            .iter()
            .map(|(alt, p)| TopLogprob {
                token: alt.to_string(),
                logprob: p.ln(),
            })
            .collect(),
    }
}

/// A mock completion service that returns scripted replies.
///
/// Replies scripted for a specific model are used first; otherwise replies
/// are popped from a shared FIFO queue. When both are empty, a default
/// "mock response" text is returned. Every request is recorded.
pub struct MockCompletion {
    by_model: Mutex<HashMap<String, VecDeque<ScriptedReply>>>,
    shared: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl MockCompletion {
    /// Create a mock with nothing scripted.
    pub fn new() -> Self {
        Self {
            by_model: Mutex::new(HashMap::new()),
            shared: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Create a mock pre-loaded with shared replies.
    pub fn with_replies(replies: Vec<ScriptedReply>) -> Self {
        Self {
            shared: Mutex::new(VecDeque::from(replies)),
            ..Self::new()
        }
    }

    /// Script a reply for one model (builder form).
    pub fn with_reply_for(mut self, model: &str, reply: ScriptedReply) -> Self {
        self.by_model
            .get_mut()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Sleep this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Script a reply for one model.
    pub async fn reply_for(&self, model: &str, reply: ScriptedReply) {
        self.by_model
            .lock()
            .await
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Add a reply to the end of the shared queue.
    pub async fn push(&self, reply: ScriptedReply) {
        self.shared.lock().await.push_back(reply);
    }

    /// All requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests received for one model.
    pub async fn requests_for(&self, model: &str) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.model == model)
            .cloned()
            .collect()
    }

    /// Number of requests received for one model.
    pub async fn calls_to(&self, model: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.model == model)
            .count()
    }

    async fn next_reply(&self, model: &str) -> ScriptedReply {
        if let Some(reply) = self
            .by_model
            .lock()
            .await
            .get_mut(model)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }
        self.shared
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| ScriptedReply::text("mock response"))
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, MnemoError> {
        self.requests.lock().await.push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.next_reply(&request.model).await;
        tracing::debug!(model = %request.model, ?reply, "mock completion reply");

        let (content, logprobs) = match reply {
            ScriptedReply::Text(content) => (content, None),
            ScriptedReply::WithLogprobs { content, logprobs } => (content, Some(logprobs)),
            ScriptedReply::Fail(message) => {
                return Err(MnemoError::Provider {
                    message,
                    source: None,
                });
            }
        };

        Ok(ChatResponse {
            content,
            model: request.model,
            logprobs: logprobs.filter(|_| request.logprobs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::types::ChatMessage;

    fn request(model: &str) -> ChatRequest {
        ChatRequest::new(model, vec![ChatMessage::user("hi")])
    }

    #[tokio::test]
    async fn model_specific_replies_win_over_shared_queue() {
        let mock = MockCompletion::with_replies(vec![ScriptedReply::text("shared")])
            .with_reply_for("router", ScriptedReply::text("RESEARCH"));

        let routed = mock.chat(request("router")).await.unwrap();
        assert_eq!(routed.content, "RESEARCH");

        let other = mock.chat(request("chat")).await.unwrap();
        assert_eq!(other.content, "shared");

        let fallback = mock.chat(request("router")).await.unwrap();
        assert_eq!(fallback.content, "mock response");
        assert_eq!(mock.calls_to("router").await, 2);
    }

    #[tokio::test]
    async fn failures_and_logprobs_are_scripted() {
        let mock = MockCompletion::new();
        mock.push(ScriptedReply::fail("boom")).await;
        mock.push(ScriptedReply::with_logprobs("[]", vec![token("x", 0.5)]))
            .await;

        let err = mock.chat(request("m")).await.unwrap_err();
        assert!(matches!(err, MnemoError::Provider { ref message, .. } if message == "boom"));

        let resp = mock
            .chat(request("m").with_json_logprobs(5))
            .await
            .unwrap();
        let logprobs = resp.logprobs.expect("requested logprobs");
        assert!((logprobs[0].logprob - 0.5f64.ln()).abs() < 1e-12);
    }

    #[tokio::test]
    async fn logprobs_withheld_when_not_requested() {
        let mock = MockCompletion::with_replies(vec![ScriptedReply::with_logprobs(
            "hi",
            vec![token("hi", 0.9)],
        )]);
        let resp = mock.chat(request("m")).await.unwrap();
        assert!(resp.logprobs.is_none());
    }
}
