// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Mnemo crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of external collaborator an adapter stands in for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Completion,
    Embedding,
    VectorStore,
}

// --- Chat types ---

/// Speaker of a chat message or session turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message sent to the completion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Structured output mode requested from the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
}

/// A request to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Ask for a JSON-only reply.
    pub format: Option<ResponseFormat>,
    /// Sampling temperature; `None` leaves the model default.
    pub temperature: Option<f32>,
    /// Ask for per-token log-probabilities.
    pub logprobs: bool,
    /// Number of ranked alternatives per token when `logprobs` is set.
    pub top_logprobs: Option<u8>,
}

impl ChatRequest {
    /// Plain conversational request with model defaults.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            format: None,
            temperature: None,
            logprobs: false,
            top_logprobs: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// JSON output with `top` ranked alternatives per generated token.
    pub fn with_json_logprobs(mut self, top: u8) -> Self {
        self.format = Some(ResponseFormat::Json);
        self.logprobs = true;
        self.top_logprobs = Some(top);
        self
    }
}

/// A ranked alternative for a generated token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopLogprob {
    pub token: String,
    pub logprob: f64,
}

/// Log-probability of one generated token plus its ranked alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenLogprob {
    pub token: String,
    pub logprob: f64,
    /// Ranked alternatives, most likely first.
    #[serde(default)]
    pub top_logprobs: Vec<TopLogprob>,
}

/// A response from the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    /// Present only when the request asked for log-probabilities and the
    /// service supplied them.
    pub logprobs: Option<Vec<TokenLogprob>>,
}

// --- Vector store types ---

/// Metadata persisted alongside each long-term memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// RFC 3339 timestamp of the last write.
    pub updated_at: String,
    /// Certainty of the extraction that produced this record, in [0, 1].
    pub confidence: f64,
    /// How many times this fact has been mined, at least 1.
    pub frequency: u32,
    /// Applicability scope; only procedural memories carry one.
    pub scope: Option<String>,
}

/// A persisted, embedding-indexed long-term memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub text: String,
    pub vector: Vec<f32>,
    pub metadata: RecordMetadata,
}

/// A record returned by a nearest-neighbour query.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub record: MemoryRecord,
    /// L2 distance from the query vector.
    pub distance: f32,
}

/// Selects records for deletion or replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// Exact match on the record text.
    TextEquals(String),
}

impl RecordFilter {
    /// Renders the filter as a SQL-style predicate with string literals
    /// escaped. For display and logs; stores bind the value instead.
    pub fn to_predicate(&self) -> String {
        match self {
            RecordFilter::TextEquals(text) => format!("text = {}", quote_literal(text)),
        }
    }

    /// Returns true if the record satisfies this filter.
    pub fn matches(&self, record: &MemoryRecord) -> bool {
        match self {
            RecordFilter::TextEquals(text) => record.text == *text,
        }
    }
}

impl std::fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_predicate())
    }
}

/// Wraps `value` in single quotes, doubling any embedded single quote.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Euclidean distance between two vectors.
///
/// Vectors of different length are infinitely far apart.
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Convert f32 vector to bytes for BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert a BLOB back to an f32 vector. Trailing partial chunks are ignored.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(text: &str) -> MemoryRecord {
        MemoryRecord {
            text: text.to_string(),
            vector: vec![0.0; 3],
            metadata: RecordMetadata {
                updated_at: "2026-03-01T00:00:00Z".to_string(),
                confidence: 0.5,
                frequency: 1,
                scope: None,
            },
        }
    }

    #[test]
    fn predicate_escapes_single_quotes() {
        let filter = RecordFilter::TextEquals("user's dog isn't named 'Max'".to_string());
        assert_eq!(
            filter.to_predicate(),
            "text = 'user''s dog isn''t named ''Max'''"
        );
    }

    #[test]
    fn predicate_for_plain_text() {
        let filter = RecordFilter::TextEquals("likes tea".to_string());
        assert_eq!(filter.to_string(), "text = 'likes tea'");
    }

    #[test]
    fn filter_matches_exact_text_only() {
        let filter = RecordFilter::TextEquals("likes tea".to_string());
        assert!(filter.matches(&record("likes tea")));
        assert!(!filter.matches(&record("likes tea.")));
        assert!(!filter.matches(&record("Likes tea")));
    }

    #[test]
    fn l2_distance_known_values() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
        assert!(l2_distance(&[1.0], &[1.0, 2.0]).is_infinite());
    }

    #[test]
    fn chat_request_json_logprobs() {
        let req = ChatRequest::new("miner", vec![ChatMessage::user("hi")]).with_json_logprobs(5);
        assert_eq!(req.format, Some(ResponseFormat::Json));
        assert!(req.logprobs);
        assert_eq!(req.top_logprobs, Some(5));
        assert_eq!(req.temperature, None);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn token_logprob_alternatives_default_empty() {
        let lp: TokenLogprob = serde_json::from_str(r#"{"token":"a","logprob":-0.1}"#).unwrap();
        assert!(lp.top_logprobs.is_empty());
    }

    proptest! {
        #[test]
        fn blob_roundtrip_preserves_values(values in proptest::collection::vec(-1.0e3f32..1.0e3, 0..64)) {
            prop_assert_eq!(blob_to_vec(&vec_to_blob(&values)), values);
        }

        #[test]
        fn l2_distance_is_symmetric(
            a in proptest::collection::vec(-10.0f32..10.0, 8),
            b in proptest::collection::vec(-10.0f32..10.0, 8),
        ) {
            prop_assert_eq!(l2_distance(&a, &b), l2_distance(&b, &a));
            prop_assert!(l2_distance(&a, &b) >= 0.0);
        }
    }
}
