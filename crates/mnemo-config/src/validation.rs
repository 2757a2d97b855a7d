// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-zero capacities, threshold ranges and non-empty model names.

use crate::diagnostic::ConfigError;
use crate::model::{MnemoConfig, StoreBackend};

/// Largest number of ranked alternatives Ollama will return per token.
const MAX_TOP_LOGPROBS: u8 = 20;

/// Upper bound for the session window and the mining trigger. Both are
/// held in memory and sent to the models as text.
const MAX_TURN_COUNT: usize = 10_000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MnemoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let memory = &config.memory;
    if memory.session_capacity == 0 {
        fail("memory.session_capacity must be at least 1".to_string());
    }
    if memory.session_capacity > MAX_TURN_COUNT {
        fail(format!(
            "memory.session_capacity must be at most {MAX_TURN_COUNT}, got {}",
            memory.session_capacity
        ));
    }
    if memory.context_turns == 0 {
        fail("memory.context_turns must be at least 1".to_string());
    }
    if memory.context_turns > memory.session_capacity {
        fail(format!(
            "memory.context_turns ({}) must not exceed memory.session_capacity ({})",
            memory.context_turns, memory.session_capacity
        ));
    }
    if memory.mining_trigger == 0 {
        fail("memory.mining_trigger must be at least 1".to_string());
    }
    if memory.mining_trigger > MAX_TURN_COUNT {
        fail(format!(
            "memory.mining_trigger must be at most {MAX_TURN_COUNT}, got {}",
            memory.mining_trigger
        ));
    }
    if !(memory.dedup_threshold.is_finite() && memory.dedup_threshold > 0.0) {
        fail(format!(
            "memory.dedup_threshold must be a positive number, got {}",
            memory.dedup_threshold
        ));
    }
    if memory.embedding_dim == 0 {
        fail("memory.embedding_dim must be at least 1".to_string());
    }
    if memory.top_logprobs == 0 || memory.top_logprobs > MAX_TOP_LOGPROBS {
        fail(format!(
            "memory.top_logprobs must be between 1 and {MAX_TOP_LOGPROBS}, got {}",
            memory.top_logprobs
        ));
    }
    if memory.backend == StoreBackend::Sqlite && memory.database_path.trim().is_empty() {
        fail("memory.database_path must not be empty for the sqlite backend".to_string());
    }

    if config.ollama.base_url.trim().is_empty() {
        fail("ollama.base_url must not be empty".to_string());
    } else if !(config.ollama.base_url.starts_with("http://")
        || config.ollama.base_url.starts_with("https://"))
    {
        fail(format!(
            "ollama.base_url `{}` must start with http:// or https://",
            config.ollama.base_url
        ));
    }
    if config.ollama.request_timeout_secs == Some(0) {
        fail("ollama.request_timeout_secs must be at least 1 when set".to_string());
    }

    let models = &config.models;
    for (key, value) in [
        ("chat", &models.chat),
        ("research", &models.research),
        ("classifier", &models.classifier),
        ("miner", &models.miner),
        ("embedding", &models.embedding),
    ] {
        if value.trim().is_empty() {
            fail(format!("models.{key} must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
