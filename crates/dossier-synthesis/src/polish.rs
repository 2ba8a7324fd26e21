// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-processing for synthesized prose.
//!
//! Drafts come back from the model with boilerplate openers and ragged
//! whitespace; these passes clean both up without touching the content.

use std::sync::LazyLock;

use regex::Regex;

/// Boilerplate phrases stripped from drafts, matched case-insensitively.
const CLICHE_PHRASES: &[&str] = &[
    "I hope this email finds you well.",
    "I hope this message finds you well.",
    "I trust this email finds you well.",
    "I hope you are doing well.",
    "As an AI language model,",
    "As an AI assistant,",
    "In today's fast-paced world,",
];

static CLICHE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    CLICHE_PHRASES
        .iter()
        .map(|phrase| Regex::new(&format!("(?i){}", regex::escape(phrase))).unwrap())
        .collect()
});

static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Strip boilerplate phrases, then normalize whitespace.
pub fn polish(text: &str) -> String {
    normalize_whitespace(&strip_cliches(text))
}

/// Remove every occurrence of the fixed boilerplate phrases.
pub fn strip_cliches(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in CLICHE_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}

/// Collapse space runs, cap consecutive blank lines at one, and trim.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines = Vec::new();
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = SPACE_RUNS.replace_all(line.trim_end(), " ");
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
            lines.push(String::new());
        } else {
            blank_run = 0;
            lines.push(line.into_owned());
        }
    }
    lines.join("\n").trim().to_string()
}

/// Word count as whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
