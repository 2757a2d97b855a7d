// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Certainty of an extraction, scored from token log-probabilities.
//!
//! Only content-bearing tokens count. Each contributes the probability of
//! the chosen token times its lead over the runner-up, so a token picked
//! with a narrow margin scores low even when its own probability is high.
//! The confidence is the mean contribution, in `[0, 1]`.

use mnemo_core::types::TokenLogprob;

/// Characters that carry JSON structure rather than content.
const STRUCTURAL_CHARS: &[char] = &['{', '}', '[', ']', '"', ':', ',', '\\'];

/// True if `token` is made only of JSON punctuation and whitespace.
/// The empty token counts as structural.
pub fn is_structural(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_whitespace() || STRUCTURAL_CHARS.contains(&c))
}

/// Confidence of a generated sequence. Empty or all-structural input is 0.
pub fn confidence(logprobs: &[TokenLogprob]) -> f64 {
    let contributions: Vec<f64> = logprobs
        .iter()
        .filter(|t| !is_structural(&t.token))
        .map(token_certainty)
        .collect();

    if contributions.is_empty() {
        return 0.0;
    }

    let mean = contributions.iter().sum::<f64>() / contributions.len() as f64;
    if mean.is_nan() {
        return 0.0;
    }
    mean.clamp(0.0, 1.0)
}

fn token_certainty(token: &TokenLogprob) -> f64 {
    let top = token.logprob.exp();
    let margin = match token.top_logprobs.get(1) {
        Some(runner_up) => top - runner_up.logprob.exp(),
        None => top,
    };
    top * margin
}
