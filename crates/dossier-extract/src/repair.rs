// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Syntactic repairs applied to near-JSON text before reparsing.
//!
//! Both repairs are heuristics for text that already failed a strict parse;
//! they trade theoretical soundness for recovering the two malformations
//! models actually produce (trailing commas, raw newlines inside strings).

use std::sync::LazyLock;

use regex::Regex;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    // A comma followed only by whitespace before a closing brace or bracket.
    Regex::new(r",\s*([}\]])").unwrap()
});

/// Remove trailing commas before `}` or `]`.
pub(crate) fn remove_trailing_commas(input: &str) -> String {
    TRAILING_COMMA.replace_all(input, "$1").into_owned()
}

/// Escape bare newline/carriage-return/tab characters inside string values.
///
/// Walks the text tracking string and escape state; control characters
/// outside strings are structural whitespace and pass through untouched.
pub(crate) fn escape_newlines_in_strings(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in input.chars() {
        if in_string {
            if escaped {
                // The preceding backslash is already emitted; a raw newline
                // here completes to a proper \n escape.
                match ch {
                    '\n' => out.push('n'),
                    other => out.push(other),
                }
                escaped = false;
                continue;
            }
            match ch {
                '\\' => {
                    out.push(ch);
                    escaped = true;
                }
                '"' => {
                    out.push(ch);
                    in_string = false;
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                other => out.push(other),
            }
        } else {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
        }
    }

    out
}
