// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress sink that captures interim notices.

use async_trait::async_trait;
use tokio::sync::Mutex;

use mnemo_core::traits::ProgressSink;
use mnemo_core::MnemoError;

/// Records every notice passed to [`ProgressSink::say`].
#[derive(Default)]
pub struct RecordingSink {
    said: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `say` always fails (after recording the text).
    pub fn failing() -> Self {
        Self {
            said: Mutex::default(),
            fail: true,
        }
    }

    /// Notices received so far.
    pub async fn said(&self) -> Vec<String> {
        self.said.lock().await.clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn say(&self, text: &str) -> Result<(), MnemoError> {
        self.said.lock().await.push(text.to_string());
        if self.fail {
            return Err(MnemoError::Internal("sink closed".to_string()));
        }
        Ok(())
    }
}
