// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types: turns, buffered exchanges, and mined findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use tracing::debug;

use mnemo_core::types::Role;
use mnemo_core::MnemoError;

/// Scope given to procedural findings that do not name one.
pub const DEFAULT_SCOPE: &str = "global";

/// One side of an exchange, as kept in the session window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A completed user/assistant exchange waiting to be mined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferedExchange {
    pub user_text: String,
    pub assistant_reply: String,
    pub recorded_at: DateTime<Utc>,
}

impl BufferedExchange {
    pub fn new(user_text: impl Into<String>, assistant_reply: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_reply: assistant_reply.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Which long-term store a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MemoryKind {
    /// Durable facts about the user or the world.
    Semantic,
    /// Behaviour and preference rules.
    Procedural,
}

impl MemoryKind {
    pub const ALL: [MemoryKind; 2] = [MemoryKind::Semantic, MemoryKind::Procedural];

    /// Name of the vector store collection holding this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            MemoryKind::Semantic => "semantic",
            MemoryKind::Procedural => "procedural",
        }
    }
}

/// A validated candidate memory extracted by the miner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    Semantic { content: String },
    Procedural { content: String, scope: String },
}

impl Finding {
    pub fn kind(&self) -> MemoryKind {
        match self {
            Finding::Semantic { .. } => MemoryKind::Semantic,
            Finding::Procedural { .. } => MemoryKind::Procedural,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Finding::Semantic { content } | Finding::Procedural { content, .. } => content,
        }
    }

    /// Applicability scope; semantic findings have none.
    pub fn scope(&self) -> Option<&str> {
        match self {
            Finding::Semantic { .. } => None,
            Finding::Procedural { scope, .. } => Some(scope),
        }
    }
}

/// Finding as emitted by the extraction model, before validation.
#[derive(Debug, Deserialize)]
struct RawFinding {
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<String>,
    scope: Option<String>,
}

impl TryFrom<RawFinding> for Finding {
    type Error = String;

    fn try_from(raw: RawFinding) -> Result<Self, Self::Error> {
        let kind_name = raw.kind.ok_or("missing `type`")?;
        let kind: MemoryKind = kind_name
            .trim()
            .parse()
            .map_err(|_| format!("unknown type `{kind_name}`"))?;

        let content = raw
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or("missing or empty `content`")?;

        Ok(match kind {
            MemoryKind::Semantic => Finding::Semantic { content },
            MemoryKind::Procedural => Finding::Procedural {
                content,
                scope: raw
                    .scope
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            },
        })
    }
}

/// Parse extraction output into validated findings.
///
/// Accepts a JSON array of finding objects, or an object with a `findings`
/// array, optionally wrapped in a markdown code fence or surrounding prose.
/// Elements that fail validation are logged and skipped. Output that holds
/// no usable JSON at all is a [`MnemoError::Parse`].
pub fn parse_findings(raw: &str) -> Result<Vec<Finding>, MnemoError> {
    let value = extract_json(raw)
        .ok_or_else(|| MnemoError::Parse("no JSON found in extraction output".to_string()))?;

    let elements = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("findings") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(MnemoError::Parse(
                    "expected a `findings` array in extraction output".to_string(),
                ));
            }
        },
        other => {
            return Err(MnemoError::Parse(format!(
                "expected an array of findings, got `{other}`"
            )));
        }
    };

    Ok(elements
        .into_iter()
        .filter_map(|element| {
            let validated = serde_json::from_value::<RawFinding>(element.clone())
                .map_err(|e| e.to_string())
                .and_then(Finding::try_from);
            match validated {
                Ok(finding) => Some(finding),
                Err(reason) => {
                    debug!(%reason, %element, "skipping malformed finding");
                    None
                }
            }
        })
        .collect())
}

fn extract_json(raw: &str) -> Option<Value> {
    let body = strip_code_fence(raw.trim());
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }

    // Prose around the payload: try the widest bracketed span.
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (body.find(open), body.rfind(close))
            && start < end
            && let Ok(value) = serde_json::from_str(&body[start..=end])
        {
            return Some(value);
        }
    }
    None
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Outcome of one mining pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MiningReport {
    /// Number of exchanges in the mined batch.
    pub exchanges: usize,
    /// Number of findings that passed validation.
    pub findings: usize,
    /// Confidence attached to every record written by this pass.
    pub confidence: f64,
    pub upsert: UpsertReport,
}

/// Counts of records written by an upsert pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// New records with frequency 1.
    pub inserted: usize,
    /// Existing records replaced with frequency incremented.
    pub merged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_json_array() {
        let raw = r#"[
            {"type": "semantic", "content": "User's dog is named Max"},
            {"type": "procedural", "content": "Answer in metric units", "scope": "units"}
        ]"#;
        let findings = parse_findings(raw).unwrap();
        assert_eq!(
            findings,
            vec![
                Finding::Semantic {
                    content: "User's dog is named Max".into()
                },
                Finding::Procedural {
                    content: "Answer in metric units".into(),
                    scope: "units".into()
                },
            ]
        );
    }

    #[test]
    fn type_is_case_insensitive_and_scope_defaults_to_global() {
        let raw = r#"[{"type": "PROCEDURAL", "content": "Be brief"}]"#;
        let findings = parse_findings(raw).unwrap();
        assert_eq!(findings[0].kind(), MemoryKind::Procedural);
        assert_eq!(findings[0].scope(), Some(DEFAULT_SCOPE));
    }

    #[test]
    fn semantic_findings_drop_scope() {
        let raw = r#"[{"type": "Semantic", "content": "Lives in Oslo", "scope": "geo"}]"#;
        let findings = parse_findings(raw).unwrap();
        assert_eq!(findings[0].scope(), None);
    }

    #[test]
    fn findings_object_is_accepted() {
        let raw = r#"{"findings": [{"type": "semantic", "content": "Likes tea"}]}"#;
        assert_eq!(parse_findings(raw).unwrap().len(), 1);
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let raw = r#"[
            {"type": "semantic"},
            {"type": "episodic", "content": "went hiking"},
            {"content": "no type"},
            {"type": "semantic", "content": "   "},
            {"type": "semantic", "content": 42},
            "just a string",
            {"type": "semantic", "content": "Keeps bees"}
        ]"#;
        let findings = parse_findings(raw).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].content(), "Keeps bees");
    }

    #[test]
    fn empty_array_is_zero_findings() {
        assert!(parse_findings("[]").unwrap().is_empty());
    }

    #[test]
    fn code_fence_is_stripped() {
        let raw = "```json\n[{\"type\": \"semantic\", \"content\": \"Uses Rust\"}]\n```";
        assert_eq!(parse_findings(raw).unwrap()[0].content(), "Uses Rust");
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let raw = "Here you go:\n[{\"type\": \"semantic\", \"content\": \"Uses vim\"}]\nDone.";
        assert_eq!(parse_findings(raw).unwrap()[0].content(), "Uses vim");
    }

    #[test]
    fn non_json_is_a_parse_error() {
        assert!(matches!(
            parse_findings("nothing memorable here"),
            Err(MnemoError::Parse(_))
        ));
        assert!(matches!(
            parse_findings(r#"{"facts": []}"#),
            Err(MnemoError::Parse(_))
        ));
        assert!(matches!(parse_findings("42"), Err(MnemoError::Parse(_))));
    }

    #[test]
    fn kinds_map_to_collections() {
        assert_eq!(MemoryKind::Semantic.collection(), "semantic");
        assert_eq!(MemoryKind::Procedural.collection(), "procedural");
        assert_eq!(MemoryKind::Procedural.to_string(), "procedural");
    }
}
