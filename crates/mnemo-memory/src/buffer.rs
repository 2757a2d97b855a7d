// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw exchange buffer that feeds mining.

use std::mem;

use crate::types::BufferedExchange;

/// Accumulates exchanges until more than `trigger` are held.
///
/// Separate from the session window: the window is context, this is
/// mining fuel.
#[derive(Debug, Clone)]
pub struct TurnBuffer {
    exchanges: Vec<BufferedExchange>,
    trigger: usize,
}

impl TurnBuffer {
    pub fn new(trigger: usize) -> Self {
        Self {
            exchanges: Vec::new(),
            trigger,
        }
    }

    /// Appends an exchange. Returns true when the buffer now holds more
    /// than `trigger` exchanges and should be mined.
    pub fn push(&mut self, user_text: &str, reply: &str) -> bool {
        self.exchanges.push(BufferedExchange::new(user_text, reply));
        self.exchanges.len() > self.trigger
    }

    /// Takes every buffered exchange, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<BufferedExchange> {
        mem::take(&mut self.exchanges)
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn trigger(&self) -> usize {
        self.trigger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_past_the_trigger() {
        let mut buffer = TurnBuffer::new(3);
        assert!(!buffer.push("q0", "a0"));
        assert!(!buffer.push("q1", "a1"));
        assert!(!buffer.push("q2", "a2"));
        assert!(buffer.push("q3", "a3"));
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn drain_empties_and_preserves_order() {
        let mut buffer = TurnBuffer::new(10);
        buffer.push("q0", "a0");
        buffer.push("q1", "a1");
        let batch = buffer.drain();
        assert!(buffer.is_empty());
        assert_eq!(batch[0].user_text, "q0");
        assert_eq!(batch[1].assistant_reply, "a1");
    }
}
