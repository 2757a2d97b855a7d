// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request pipeline: classify, answer, remember.

use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use mnemo_config::model::MnemoConfig;
use mnemo_core::traits::{CompletionAdapter, EmbeddingAdapter, ProgressSink, VectorStore};
use mnemo_core::types::{ChatMessage, ChatRequest};
use mnemo_core::MnemoError;
use mnemo_memory::{MemoryContext, MemoryUpserter, Miner};

use crate::intent::{parse_intent, Intent};
use crate::queue::SerialQueue;

/// Prefix put on every research reply.
pub const RESEARCH_HEADER: &str = "*Research Report:*\n\n";

/// Model names and prompts used by the router.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub chat_model: String,
    pub research_model: String,
    pub classifier_model: String,
    pub chat_system: String,
    pub research_system: String,
    pub classifier_system: String,
    pub research_notice: String,
}

impl AgentSettings {
    pub fn from_config(config: &MnemoConfig) -> Self {
        Self {
            chat_model: config.models.chat.clone(),
            research_model: config.models.research.clone(),
            classifier_model: config.models.classifier.clone(),
            chat_system: config.prompts.chat_system.clone(),
            research_system: config.prompts.research_system.clone(),
            classifier_system: config.prompts.classifier_system.clone(),
            research_notice: config.prompts.research_notice.clone(),
        }
    }
}

/// Entry point for front ends.
///
/// Every request runs as one task on a [`SerialQueue`] that owns the
/// [`MemoryContext`], so requests never interleave their reads and writes
/// of the session window and turn buffer.
pub struct Agent {
    completion: Arc<dyn CompletionAdapter>,
    settings: Arc<AgentSettings>,
    queue: SerialQueue<MemoryContext>,
}

impl Agent {
    /// Must be called inside a Tokio runtime; spawns the queue worker.
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        settings: AgentSettings,
        context: MemoryContext,
    ) -> Self {
        Self {
            completion,
            settings: Arc::new(settings),
            queue: SerialQueue::new(context),
        }
    }

    /// Wires the miner, upserter and memory context from configuration.
    ///
    /// `store` must already hold the `semantic` and `procedural` collections.
    pub fn from_config(
        config: &MnemoConfig,
        completion: Arc<dyn CompletionAdapter>,
        embedder: Arc<dyn EmbeddingAdapter>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let memory = &config.memory;
        let upserter = MemoryUpserter::new(
            embedder,
            store,
            config.models.embedding.clone(),
            memory.embedding_dim,
            memory.dedup_threshold,
        );
        let miner = Miner::new(
            completion.clone(),
            upserter,
            config.models.miner.clone(),
            memory.top_logprobs,
        );
        let context = MemoryContext::from_config(memory, Arc::new(miner));

        info!(
            agent_name = config.agent.name.as_str(),
            chat_model = config.models.chat.as_str(),
            "agent initialized"
        );
        Self::new(completion, AgentSettings::from_config(config), context)
    }

    /// Answers `text`, recording the exchange in memory.
    ///
    /// Waits behind every request queued before it. Research requests send
    /// an interim notice through `sink` first. A service failure fails only
    /// this request, and the exchange is not recorded.
    pub async fn route_request(
        &self,
        text: &str,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Result<String, MnemoError> {
        let completion = self.completion.clone();
        let settings = self.settings.clone();
        let text = text.to_string();

        self.queue
            .enqueue(move |ctx: &mut MemoryContext| {
                async move {
                    handle_request(
                        completion.as_ref(),
                        &settings,
                        ctx,
                        &text,
                        sink.as_deref(),
                    )
                    .await
                }
                .boxed()
            })
            .await
    }
}

async fn handle_request(
    completion: &dyn CompletionAdapter,
    settings: &AgentSettings,
    ctx: &mut MemoryContext,
    text: &str,
    sink: Option<&dyn ProgressSink>,
) -> Result<String, MnemoError> {
    let intent = classify(completion, settings, text).await?;
    info!(intent = %intent, "request routed");

    let history = ctx.history();
    let reply = match intent {
        Intent::Chat => {
            let messages = with_history(&settings.chat_system, history, text.to_string());
            let request = ChatRequest::new(settings.chat_model.clone(), messages);
            completion.chat(request).await?.content
        }
        Intent::Research => {
            if let Some(sink) = sink {
                if let Err(e) = sink.say(&settings.research_notice).await {
                    warn!(error = %e, "failed to send research notice");
                }
            }
            let prompt = format!("Provide a comprehensive report on: {text}");
            let messages = with_history(&settings.research_system, history, prompt);
            let request = ChatRequest::new(settings.research_model.clone(), messages);
            let report = completion.chat(request).await?.content;
            format!("{RESEARCH_HEADER}{report}")
        }
    };

    if let Some(report) = ctx.record_exchange(text, &reply).await {
        debug!(
            findings = report.findings,
            inserted = report.upsert.inserted,
            merged = report.upsert.merged,
            "memory consolidated"
        );
    }
    Ok(reply)
}

async fn classify(
    completion: &dyn CompletionAdapter,
    settings: &AgentSettings,
    text: &str,
) -> Result<Intent, MnemoError> {
    let request = ChatRequest::new(
        settings.classifier_model.clone(),
        vec![
            ChatMessage::system(settings.classifier_system.clone()),
            ChatMessage::user(text),
        ],
    )
    .with_temperature(0.0);
    let verdict = completion.chat(request).await?.content;
    debug!(verdict = verdict.trim(), "classifier replied");
    Ok(parse_intent(&verdict))
}

fn with_history(system: &str, history: Vec<ChatMessage>, user: String) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history);
    messages.push(ChatMessage::user(user));
    messages
}
