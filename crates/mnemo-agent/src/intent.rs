// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request intent as decided by the classifier model.

use strum::Display;

/// Which handler answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Intent {
    Chat,
    Research,
}

/// Reads the classifier's one-word verdict.
///
/// Letters are upper-cased and everything else is dropped, so `"research."`
/// and `" Research\n"` both count. Anything other than `RESEARCH` is chat.
pub fn parse_intent(raw: &str) -> Intent {
    let word: String = raw
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if word == "RESEARCH" {
        Intent::Research
    } else {
        Intent::Chat
    }
}
