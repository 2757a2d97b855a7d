// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mnemo memory engine.

use thiserror::Error;

/// The primary error type used across all Mnemo adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MnemoError {
    /// Configuration errors (invalid values, missing settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Vector store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Completion service errors (HTTP failure, non-success status, bad payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding service returned nothing usable (empty or wrong dimension).
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Model output could not be parsed into the expected structure.
    #[error("parse error: {0}")]
    Parse(String),

    /// The named collection does not exist in the vector store.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// The named collection already exists in the vector store.
    #[error("collection already exists: {0}")]
    CollectionExists(String),

    /// The request queue worker has stopped and accepts no more tasks.
    #[error("request queue is closed")]
    QueueClosed,

    /// A queued task panicked while running.
    #[error("queued task panicked")]
    TaskPanicked,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MnemoError {
    /// Wraps any error as a storage failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        MnemoError::Storage {
            source: Box::new(source),
        }
    }
}
