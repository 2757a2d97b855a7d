// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama native API.
//!
//! Provides [`OllamaClient`] which handles request construction and
//! error mapping for `/api/chat`, `/api/embed` and `/api/tags`.

use std::time::Duration;

use mnemo_core::MnemoError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::ApiErrorResponse;

/// Default base URL of a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// HTTP client for Ollama communication.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// `timeout` bounds each request; `None` lets a request wait as long
    /// as the server takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, MnemoError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| MnemoError::Provider {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` as JSON to `path` and decodes a JSON reply.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, MnemoError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| MnemoError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        decode(path, response).await
    }

    /// GETs `path` and decodes a JSON reply.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, MnemoError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MnemoError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        decode(path, response).await
    }
}

async fn decode<R: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<R, MnemoError> {
    let status = response.status();
    debug!(status = %status, path, "ollama response received");

    let body = response.text().await.map_err(|e| MnemoError::Provider {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!("Ollama API error ({status}): {}", api_err.error),
            Err(_) => format!("API returned {status}: {body}"),
        };
        return Err(MnemoError::Provider {
            message,
            source: None,
        });
    }

    serde_json::from_str(&body).map_err(|e| MnemoError::Provider {
        message: format!("failed to parse {path} response: {e}"),
        source: Some(Box::new(e)),
    })
}
