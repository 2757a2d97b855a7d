// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mnemo shell` command implementation.
//!
//! A readline REPL standing in for a chat platform: each line is routed
//! through the agent, interim notices print dimmed, replies print plain.

use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::error;

use mnemo_config::model::MnemoConfig;
use mnemo_core::traits::ProgressSink;
use mnemo_core::MnemoError;

use crate::bootstrap::build_agent;

/// Shown instead of the underlying error when a request fails.
const GENERIC_FAILURE: &str = "Sorry, something went wrong while handling that message.";

/// Prints interim notices to the terminal.
struct TerminalSink;

#[async_trait]
impl ProgressSink for TerminalSink {
    async fn say(&self, text: &str) -> Result<(), MnemoError> {
        println!("{}", text.dimmed());
        Ok(())
    }
}

/// Runs the `mnemo shell` interactive REPL.
pub async fn run_shell(config: MnemoConfig) -> Result<(), MnemoError> {
    let agent = build_agent(&config).await?;
    let sink: Arc<dyn ProgressSink> = Arc::new(TerminalSink);

    let mut rl = DefaultEditor::new()
        .map_err(|e| MnemoError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.agent.name).bold().green());
    println!("Type {} to exit.\n", "/quit".yellow());

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match agent.route_request(trimmed, Some(sink.clone())).await {
                    Ok(reply) => println!("{}\n", reply),
                    Err(e) => {
                        error!(error = %e, "request failed");
                        eprintln!("{}\n", GENERIC_FAILURE.red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}
