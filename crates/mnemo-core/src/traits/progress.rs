// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mid-request progress notices back to the user.

use async_trait::async_trait;

use crate::error::MnemoError;

/// Sink for interim messages sent while a request is still running
/// (e.g. "looking into it..." before a slow research reply).
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn say(&self, text: &str) -> Result<(), MnemoError>;
}
