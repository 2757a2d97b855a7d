// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Mnemo's long-term memories.
//!
//! Provides a WAL-mode SQLite [`VectorStore`](mnemo_core::VectorStore) with
//! embedded migrations and a single-writer concurrency model via
//! `tokio-rusqlite`. Nearest-neighbour search is a linear L2 scan over the
//! collection.

pub mod database;
pub mod migrations;
pub mod store;

pub use store::SqliteVectorStore;
