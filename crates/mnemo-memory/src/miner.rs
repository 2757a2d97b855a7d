// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge mining from buffered exchanges.
//!
//! The batch is rendered as a transcript and sent to the miner model, which
//! answers in JSON with per-token log-probabilities. Valid findings are
//! scored with [`confidence`](crate::confidence::confidence) and handed to
//! the [`MemoryUpserter`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use mnemo_core::traits::CompletionAdapter;
use mnemo_core::types::{ChatMessage, ChatRequest};
use mnemo_core::MnemoError;

use crate::confidence::confidence;
use crate::types::{parse_findings, BufferedExchange, MiningReport};
use crate::upsert::MemoryUpserter;

/// Anything that can turn a batch of exchanges into stored memories.
#[async_trait]
pub trait BatchMiner: Send + Sync {
    async fn mine(&self, batch: &[BufferedExchange]) -> Result<MiningReport, MnemoError>;
}

/// Mines with a completion model and upserts into the vector store.
pub struct Miner {
    completion: Arc<dyn CompletionAdapter>,
    upserter: MemoryUpserter,
    model: String,
    top_logprobs: u8,
}

impl Miner {
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        upserter: MemoryUpserter,
        model: impl Into<String>,
        top_logprobs: u8,
    ) -> Self {
        Self {
            completion,
            upserter,
            model: model.into(),
            top_logprobs,
        }
    }
}

#[async_trait]
impl BatchMiner for Miner {
    /// No-op on an empty batch. Unparseable model output yields zero
    /// findings; service failures are returned to the caller.
    async fn mine(&self, batch: &[BufferedExchange]) -> Result<MiningReport, MnemoError> {
        let mut report = MiningReport {
            exchanges: batch.len(),
            ..MiningReport::default()
        };
        if batch.is_empty() {
            return Ok(report);
        }

        let request = ChatRequest::new(&self.model, vec![ChatMessage::user(transcript(batch))])
            .with_json_logprobs(self.top_logprobs);
        let response = self.completion.chat(request).await?;

        let findings = match parse_findings(&response.content) {
            Ok(findings) => findings,
            Err(e) => {
                warn!(error = %e, "miner output was not usable JSON");
                debug!(raw = %response.content, "raw miner output");
                Vec::new()
            }
        };
        if findings.is_empty() {
            debug!(exchanges = batch.len(), "mining produced no findings");
            return Ok(report);
        }

        let score = confidence(response.logprobs.as_deref().unwrap_or_default());
        report.findings = findings.len();
        report.confidence = score;
        report.upsert = self.upserter.upsert(&findings, score).await?;

        info!(
            findings = report.findings,
            inserted = report.upsert.inserted,
            merged = report.upsert.merged,
            confidence = score,
            "knowledge base updated"
        );
        Ok(report)
    }
}

/// Renders exchanges as `User:`/`Assistant:` pairs separated by blank lines.
pub fn transcript(batch: &[BufferedExchange]) -> String {
    batch
        .iter()
        .map(|e| format!("User: {}\nAssistant: {}", e.user_text, e.assistant_reply))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ensure_collections, InMemoryVectorStore};
    use mnemo_core::traits::VectorStore;
    use mnemo_core::types::ResponseFormat;
    use mnemo_test_utils::{token, token_with_alternatives, MockCompletion, MockEmbedder, ScriptedReply};

    const MINER: &str = "memory-miner";

    async fn miner_with(
        completion: Arc<MockCompletion>,
    ) -> (Miner, Arc<InMemoryVectorStore>) {
        let store = Arc::new(InMemoryVectorStore::new());
        ensure_collections(store.as_ref()).await.unwrap();
        let upserter =
            MemoryUpserter::new(Arc::new(MockEmbedder::new(8)), store.clone(), "embed", 8, 0.4);
        (Miner::new(completion, upserter, MINER, 5), store)
    }

    fn batch() -> Vec<BufferedExchange> {
        vec![
            BufferedExchange::new("I live in Oslo", "Nice city!"),
            BufferedExchange::new("Keep answers short", "Will do."),
        ]
    }

    #[test]
    fn transcript_format() {
        assert_eq!(
            transcript(&batch()),
            "User: I live in Oslo\nAssistant: Nice city!\n\nUser: Keep answers short\nAssistant: Will do."
        );
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let completion = Arc::new(MockCompletion::new());
        let (miner, _) = miner_with(completion.clone()).await;
        let report = miner.mine(&[]).await.unwrap();
        assert_eq!(report, MiningReport::default());
        assert!(completion.requests().await.is_empty());
    }

    #[tokio::test]
    async fn sends_transcript_as_json_request_with_logprobs() {
        let completion = Arc::new(MockCompletion::new().with_reply_for(
            MINER,
            ScriptedReply::text("[]"),
        ));
        let (miner, _) = miner_with(completion.clone()).await;
        miner.mine(&batch()).await.unwrap();

        let requests = completion.requests_for(MINER).await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.messages, vec![ChatMessage::user(transcript(&batch()))]);
        assert_eq!(request.format, Some(ResponseFormat::Json));
        assert!(request.logprobs);
        assert_eq!(request.top_logprobs, Some(5));
    }

    #[tokio::test]
    async fn findings_are_stored_with_confidence() {
        let content = r#"[{"type":"semantic","content":"Lives in Oslo"},{"type":"procedural","content":"Keep answers short"}]"#;
        let logprobs = vec![
            token("[{\"", 0.99),
            token_with_alternatives("Oslo", 0.9, &[("Oslo", 0.9), ("Bergen", 0.05)]),
            token("short", 0.5),
            token("\"}]", 0.99),
        ];
        let completion = Arc::new(MockCompletion::new().with_reply_for(
            MINER,
            ScriptedReply::with_logprobs(content, logprobs),
        ));
        let (miner, store) = miner_with(completion).await;

        let report = miner.mine(&batch()).await.unwrap();
        assert_eq!(report.findings, 2);
        assert_eq!(report.upsert.inserted, 2);
        assert!((report.confidence - 0.5075).abs() < 1e-12);

        let semantic = store.records("semantic").await.unwrap();
        assert_eq!(semantic[0].text, "Lives in Oslo");
        assert_eq!(semantic[0].metadata.scope, None);
        assert!((semantic[0].metadata.confidence - 0.5075).abs() < 1e-12);

        let procedural = store.records("procedural").await.unwrap();
        assert_eq!(procedural[0].text, "Keep answers short");
        assert_eq!(procedural[0].metadata.scope.as_deref(), Some("global"));
    }

    #[tokio::test]
    async fn missing_logprobs_store_with_zero_confidence() {
        let completion = Arc::new(MockCompletion::new().with_reply_for(
            MINER,
            ScriptedReply::text(r#"[{"type":"semantic","content":"Likes tea"}]"#),
        ));
        let (miner, store) = miner_with(completion).await;

        let report = miner.mine(&batch()).await.unwrap();
        assert_eq!(report.confidence, 0.0);
        assert_eq!(store.records("semantic").await.unwrap()[0].metadata.confidence, 0.0);
    }

    #[tokio::test]
    async fn unparseable_output_is_zero_findings() {
        let completion = Arc::new(MockCompletion::new().with_reply_for(
            MINER,
            ScriptedReply::text("I could not find anything."),
        ));
        let (miner, store) = miner_with(completion).await;

        let report = miner.mine(&batch()).await.unwrap();
        assert_eq!(report.findings, 0);
        assert_eq!(store.count("semantic").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn service_failure_propagates() {
        let completion = Arc::new(MockCompletion::new().with_reply_for(
            MINER,
            ScriptedReply::fail("model not loaded"),
        ));
        let (miner, _) = miner_with(completion).await;
        assert!(matches!(
            miner.mine(&batch()).await,
            Err(MnemoError::Provider { .. })
        ));
    }
}
