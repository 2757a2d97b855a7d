// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state shared by every request: session window plus the
//! mining buffer.

use std::sync::Arc;

use tracing::{debug, warn};

use mnemo_config::model::MemoryConfig;
use mnemo_core::types::ChatMessage;

use crate::buffer::TurnBuffer;
use crate::miner::BatchMiner;
use crate::session::SessionWindow;
use crate::types::{MiningReport, Turn};

/// Owns the session window and turn buffer.
///
/// Mutated through `&mut self` only, so whoever holds it exclusively (the
/// request queue worker) is the sole writer.
pub struct MemoryContext {
    session: SessionWindow,
    buffer: TurnBuffer,
    miner: Arc<dyn BatchMiner>,
}

impl MemoryContext {
    pub fn new(session: SessionWindow, buffer: TurnBuffer, miner: Arc<dyn BatchMiner>) -> Self {
        Self {
            session,
            buffer,
            miner,
        }
    }

    /// Builds the window and buffer from `[memory]` settings.
    pub fn from_config(config: &MemoryConfig, miner: Arc<dyn BatchMiner>) -> Self {
        Self::new(
            SessionWindow::new(config.session_capacity, config.context_turns),
            TurnBuffer::new(config.mining_trigger),
            miner,
        )
    }

    /// Records a finished exchange, mining inline once the buffer passes
    /// its trigger.
    ///
    /// The buffer is drained before mining starts, so a failed mining pass
    /// loses its batch. Failures are logged, never returned; the report is
    /// `Some` only for a pass that ran to completion.
    pub async fn record_exchange(&mut self, user_text: &str, reply: &str) -> Option<MiningReport> {
        self.session.add_turn(user_text, reply);
        if !self.buffer.push(user_text, reply) {
            return None;
        }

        let batch = self.buffer.drain();
        debug!(exchanges = batch.len(), "mining triggered");
        match self.miner.mine(&batch).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, dropped = batch.len(), "extraction failed, batch discarded");
                None
            }
        }
    }

    /// Recent turns, oldest first.
    pub fn context(&self) -> Vec<Turn> {
        self.session.context()
    }

    /// Recent turns as chat history.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.session.to_messages()
    }

    pub fn session(&self) -> &SessionWindow {
        &self.session
    }

    /// Exchanges waiting to be mined.
    pub fn pending_exchanges(&self) -> usize {
        self.buffer.len()
    }
}
