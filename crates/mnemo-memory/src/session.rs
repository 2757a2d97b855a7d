// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded window of recent turns used as conversation history.

use std::collections::VecDeque;

use mnemo_core::types::{ChatMessage, Role};

use crate::types::Turn;

/// Most recent turns of the conversation, oldest first.
///
/// Holds at most `capacity` turns; adding past that evicts from the oldest
/// end. In-memory only.
#[derive(Debug, Clone)]
pub struct SessionWindow {
    turns: VecDeque<Turn>,
    capacity: usize,
    context_turns: usize,
}

impl SessionWindow {
    /// `context_turns` is how many turns [`context`](Self::context) hands out.
    pub fn new(capacity: usize, context_turns: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            capacity,
            context_turns,
        }
    }

    /// Appends a user turn then an assistant turn.
    pub fn add_turn(&mut self, user_text: &str, reply: &str) {
        self.turns.push_back(Turn::new(Role::User, user_text));
        self.turns.push_back(Turn::new(Role::Assistant, reply));
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// The most recent turns, oldest first.
    pub fn context(&self) -> Vec<Turn> {
        let skip = self.turns.len().saturating_sub(self.context_turns);
        self.turns.iter().skip(skip).cloned().collect()
    }

    /// [`context`](Self::context) as chat history.
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        self.context()
            .into_iter()
            .map(|turn| ChatMessage {
                role: turn.role,
                content: turn.content,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
