// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure parse stages of the repair cascade.
//!
//! Each stage takes the raw reply text and either produces a parsed value or
//! passes; the driver in `lib.rs` runs them in order and stops at the first
//! success.

use serde_json::{Map, Value};

use crate::repair::{escape_newlines_in_strings, remove_trailing_commas};

/// Strip a surrounding markdown code fence, including an optional info
/// string (```` ```json ````), returning the inner body.
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// The outermost `{...}` span, located by first `{` and last `}`.
fn object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// The outermost `[...]` span, located by first `[` and last `]`.
fn array_span(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// Stage 1: strip code fences and parse directly.
pub(crate) fn direct_object(raw: &str) -> Option<Map<String, Value>> {
    parse_object(strip_code_fences(raw))
}

/// Stage 2: parse the outermost brace span.
pub(crate) fn outer_object_span(raw: &str) -> Option<Map<String, Value>> {
    parse_object(object_span(raw)?)
}

/// Stage 3: apply syntactic repairs to the brace span and reparse.
pub(crate) fn repaired_object_span(raw: &str) -> Option<Map<String, Value>> {
    let span = object_span(raw)?;
    let repaired = escape_newlines_in_strings(&remove_trailing_commas(span));
    parse_object(&repaired)
}

/// Stage 1, array form.
pub(crate) fn direct_array(raw: &str) -> Option<Vec<Value>> {
    parse_array(strip_code_fences(raw))
}

/// Stage 2, array form.
pub(crate) fn outer_array_span(raw: &str) -> Option<Vec<Value>> {
    parse_array(array_span(raw)?)
}

/// Stage 3, array form.
pub(crate) fn repaired_array_span(raw: &str) -> Option<Vec<Value>> {
    let span = array_span(raw)?;
    let repaired = escape_newlines_in_strings(&remove_trailing_commas(span));
    parse_array(&repaired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_fence_without_language_tag() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn object_span_ignores_surrounding_prose() {
        let raw = "Sure! Here is the JSON you asked for: {\"a\": 1}. Let me know.";
        assert_eq!(object_span(raw), Some("{\"a\": 1}"));
    }

    #[test]
    fn object_span_rejects_reversed_braces() {
        assert_eq!(object_span("} nothing {"), None);
    }

    #[test]
    fn direct_object_rejects_arrays() {
        assert!(direct_object("[1, 2]").is_none());
    }

    #[test]
    fn repaired_span_recovers_trailing_comma() {
        let raw = "reply: {\"a\": 1,}";
        let map = repaired_object_span(raw).expect("should repair");
        assert_eq!(map["a"], 1);
    }

    #[test]
    fn repaired_span_recovers_bare_newline() {
        let raw = "{\"note\": \"one\ntwo\"}";
        let map = repaired_object_span(raw).expect("should repair");
        assert_eq!(map["note"], "one\ntwo");
    }

    #[test]
    fn array_span_recovers_from_prose() {
        let raw = "Entities found:\n[{\"name\": \"Acme\"}]\nDone.";
        let items = outer_array_span(raw).expect("should parse");
        assert_eq!(items.len(), 1);
    }
}
