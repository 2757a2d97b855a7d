// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mnemo doctor` command implementation.
//!
//! Probes the model server, the embedding model and the memory store, and
//! prints one line per check.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use colored::Colorize;

use mnemo_config::model::MnemoConfig;
use mnemo_core::traits::{EmbeddingAdapter, PluginAdapter};
use mnemo_core::types::HealthStatus;
use mnemo_core::MnemoError;
use mnemo_memory::MemoryKind;
use mnemo_ollama::OllamaProvider;

use crate::bootstrap::open_store;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `mnemo doctor` command.
pub async fn run_doctor(config: &MnemoConfig, plain: bool) -> Result<(), MnemoError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = match OllamaProvider::new(&config.ollama) {
        Ok(provider) => vec![
            check_model_server(&provider).await,
            check_embedding(&provider, config).await,
            check_store(config).await,
        ],
        Err(e) => vec![
            CheckResult::new("Model server", CheckStatus::Fail, e.to_string(), Instant::now()),
            check_store(config).await,
        ],
    };

    println!();
    println!("  mnemo doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", render_line(result, use_color));
    }
    println!();

    if issues > 0 {
        let word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let ms = result.duration.as_millis();
    if !use_color {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        return format!("    {tag} {:<20} {} ({ms}ms)", result.name, result.message);
    }

    let (symbol, message) = match result.status {
        CheckStatus::Pass => ("✓".green(), result.message.normal()),
        CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
        CheckStatus::Fail => ("✗".red(), result.message.red()),
    };
    format!("    {symbol} {:<20} {message} ({ms}ms)", result.name)
}

async fn check_model_server(provider: &OllamaProvider) -> CheckResult {
    let start = Instant::now();
    match provider.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new("Model server", CheckStatus::Pass, "reachable", start)
        }
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new("Model server", CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("Model server", CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new("Model server", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_embedding(provider: &OllamaProvider, config: &MnemoConfig) -> CheckResult {
    let start = Instant::now();
    let model = config.models.embedding.as_str();
    match provider.embed(model, "ping").await {
        Ok(vector) => dimension_result(vector.len(), config.memory.embedding_dim, start),
        Err(e) => CheckResult::new("Embedding model", CheckStatus::Fail, e.to_string(), start),
    }
}

fn dimension_result(actual: usize, expected: usize, start: Instant) -> CheckResult {
    if actual == expected {
        CheckResult::new(
            "Embedding model",
            CheckStatus::Pass,
            format!("{actual} dimensions"),
            start,
        )
    } else {
        CheckResult::new(
            "Embedding model",
            CheckStatus::Fail,
            format!("returned {actual} dimensions, memory.embedding_dim is {expected}"),
            start,
        )
    }
}

async fn check_store(config: &MnemoConfig) -> CheckResult {
    let start = Instant::now();
    let store = match open_store(&config.memory).await {
        Ok(store) => store,
        Err(e) => return CheckResult::new("Memory store", CheckStatus::Fail, e.to_string(), start),
    };

    let mut counts = Vec::new();
    for kind in MemoryKind::ALL {
        match store.count(kind.collection()).await {
            Ok(n) => counts.push(format!("{} {n}", kind.collection())),
            Err(e) => {
                return CheckResult::new("Memory store", CheckStatus::Fail, e.to_string(), start);
            }
        }
    }
    CheckResult::new("Memory store", CheckStatus::Pass, counts.join(", "), start)
}
