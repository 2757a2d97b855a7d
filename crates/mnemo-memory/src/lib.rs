// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational memory for the Mnemo engine.
//!
//! Keeps a bounded window of recent turns for LLM context and mines
//! buffered exchanges into two long-term stores: durable facts
//! (`semantic`) and behaviour rules (`procedural`).
//!
//! ## Architecture
//!
//! - **SessionWindow**: Most recent turns, oldest first, FIFO-evicted
//! - **TurnBuffer**: Mining fuel; signals once it passes the trigger
//! - **Miner**: Transcript to JSON findings via the miner model
//! - **confidence**: Certainty from token log-probabilities
//! - **MemoryUpserter**: Embedding, nearest-neighbour dedup and writes
//! - **MemoryContext**: Owns window and buffer, drives mining
//! - **InMemoryVectorStore**: Process-local `VectorStore`

pub mod buffer;
pub mod confidence;
pub mod context;
pub mod miner;
pub mod session;
pub mod store;
pub mod types;
pub mod upsert;

pub use buffer::TurnBuffer;
pub use confidence::confidence;
pub use context::MemoryContext;
pub use miner::{BatchMiner, Miner};
pub use session::SessionWindow;
pub use store::{ensure_collections, InMemoryVectorStore};
pub use types::*;
pub use upsert::MemoryUpserter;
