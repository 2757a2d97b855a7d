// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mnemo integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without a model server.
//!
//! # Components
//!
//! - [`MockCompletion`] - Scripted chat completions, optionally with token log-probabilities
//! - [`MockEmbedder`] - Deterministic text embeddings with failure injection
//! - [`RecordingSink`] - Captures interim progress notices

pub mod mock_completion;
pub mod mock_embedder;
pub mod recording_sink;

pub use mock_completion::{token, token_with_alternatives, MockCompletion, ScriptedReply};
pub use mock_embedder::MockEmbedder;
pub use recording_sink::RecordingSink;
