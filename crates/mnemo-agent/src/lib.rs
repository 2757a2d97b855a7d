// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handling for the Mnemo memory engine.
//!
//! The [`Agent`] is what a front end talks to:
//! - Serializes every request through a [`SerialQueue`]
//! - Classifies each message as chat or research
//! - Answers with the matching model, using the session window as history
//! - Records the exchange, mining long-term memories when the buffer fills

pub mod agent;
pub mod intent;
pub mod queue;

pub use agent::{Agent, AgentSettings, RESEARCH_HEADER};
pub use intent::{parse_intent, Intent};
pub use queue::SerialQueue;
