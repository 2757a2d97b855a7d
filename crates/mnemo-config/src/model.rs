// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemo memory engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Mnemo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemoConfig {
    /// Agent identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Connection to the Ollama-compatible model server.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Model names for each role.
    #[serde(default)]
    pub models: ModelsConfig,

    /// Session window, mining and long-term store settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// System prompts and canned notices.
    #[serde(default)]
    pub prompts: PromptsConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "mnemo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Ollama server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the server, without a trailing `/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request HTTP timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

/// Model names used for each request kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    /// Everyday conversational replies.
    #[serde(default = "default_chat_model")]
    pub chat: String,

    /// Long-form research reports.
    #[serde(default = "default_research_model")]
    pub research: String,

    /// Intent classification (CHAT vs RESEARCH).
    #[serde(default = "default_classifier_model")]
    pub classifier: String,

    /// Knowledge extraction from buffered exchanges.
    #[serde(default = "default_miner_model")]
    pub miner: String,

    /// Text embeddings for the long-term stores.
    #[serde(default = "default_embedding_model")]
    pub embedding: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            chat: default_chat_model(),
            research: default_research_model(),
            classifier: default_classifier_model(),
            miner: default_miner_model(),
            embedding: default_embedding_model(),
        }
    }
}

fn default_chat_model() -> String {
    "butler-chat".to_string()
}

fn default_research_model() -> String {
    "geek-research".to_string()
}

fn default_classifier_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_miner_model() -> String {
    "memory-miner".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

/// Which vector store backs the long-term memories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    /// SQLite file at `memory.database_path`.
    #[default]
    Sqlite,
    /// Process-local store, lost on restart.
    InMemory,
}

/// Memory engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Maximum number of turns kept in the session window.
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,

    /// Number of most recent turns handed to the model as history.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// Mining runs once the turn buffer holds more than this many exchanges.
    #[serde(default = "default_mining_trigger")]
    pub mining_trigger: usize,

    /// L2 distance below which a new finding replaces its nearest neighbour.
    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f32,

    /// Dimension of vectors produced by the embedding model.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Ranked alternatives requested per token during mining.
    #[serde(default = "default_top_logprobs")]
    pub top_logprobs: u8,

    /// Vector store backend.
    #[serde(default)]
    pub backend: StoreBackend,

    /// SQLite database file for the `sqlite` backend.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            session_capacity: default_session_capacity(),
            context_turns: default_context_turns(),
            mining_trigger: default_mining_trigger(),
            dedup_threshold: default_dedup_threshold(),
            embedding_dim: default_embedding_dim(),
            top_logprobs: default_top_logprobs(),
            backend: StoreBackend::default(),
            database_path: default_database_path(),
        }
    }
}

fn default_session_capacity() -> usize {
    10
}

fn default_context_turns() -> usize {
    10
}

fn default_mining_trigger() -> usize {
    15
}

fn default_dedup_threshold() -> f32 {
    0.4
}

fn default_embedding_dim() -> usize {
    768
}

fn default_top_logprobs() -> u8 {
    5
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("mnemo/memory.db").display().to_string())
        .unwrap_or_else(|| "data/memory.db".to_string())
}

/// System prompts and fixed user-facing strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptsConfig {
    /// System prompt for conversational replies.
    #[serde(default = "default_chat_system")]
    pub chat_system: String,

    /// System prompt for research reports.
    #[serde(default = "default_research_system")]
    pub research_system: String,

    /// System prompt for the intent classifier. Must steer the model to
    /// answer with a single word: CHAT or RESEARCH.
    #[serde(default = "default_classifier_system")]
    pub classifier_system: String,

    /// Interim notice sent before a research reply.
    #[serde(default = "default_research_notice")]
    pub research_notice: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            chat_system: default_chat_system(),
            research_system: default_research_system(),
            classifier_system: default_classifier_system(),
            research_notice: default_research_notice(),
        }
    }
}

fn default_chat_system() -> String {
    "You are a helpful assistant. Use the conversation so far as context.".to_string()
}

fn default_research_system() -> String {
    "You are a thorough researcher. Use the conversation so far as context.".to_string()
}

fn default_classifier_system() -> String {
    "Classify the user's message. Reply with exactly one word: RESEARCH if it asks for an \
     in-depth report or investigation, otherwise CHAT."
        .to_string()
}

fn default_research_notice() -> String {
    "looking into it...".to_string()
}
