// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic token counting.
//!
//! Approximates how many LLM tokens a piece of text consumes without running
//! a real tokenizer:
//!
//! 1. Every occurrence of each entry in [`SPECIAL_SEQUENCES`] is replaced by
//!    [`PLACEHOLDER`], one entry at a time in list order.
//! 2. The result is split into maximal word runs and single non-word,
//!    non-space characters.
//! 3. Digit runs cost `len / 2 + 1`, other runs longer than 8 characters
//!    cost `len / 4 + 1`, everything else costs 1.
//! 4. Each newline and each pair of consecutive spaces adds 1.
//!
//! The result is deterministic. It is not a model of any real tokenizer, and
//! the substitution order is part of the contract: reordering the catalog
//! changes counts.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use trialcost_core::TrialCostError;

use crate::serialize::to_row_string;

/// Substrings collapsed to a single placeholder before counting, in application order.
pub const SPECIAL_SEQUENCES: [&str; 19] = [
    "http://",
    "https://",
    ".com",
    ".org",
    ".gov",
    "@",
    "#",
    "$",
    "%",
    "&",
    "SELECT",
    "FROM",
    "WHERE",
    "JOIN",
    "ORDER BY",
    "JSON",
    "VARCHAR",
    "INTEGER",
    "TIMESTAMP",
];

/// Marker substituted for every special sequence.
pub const PLACEHOLDER: &str = "TOKEN";

/// Runs longer than this many characters are charged per four characters.
pub const LONG_WORD_THRESHOLD: usize = 8;

/// A maximal word run, or a single character that is neither word nor space.
///
/// Word characters are letters, numbers of any kind and `_`; combining marks
/// are not. Space includes the information separators `\x1C`..`\x1F`.
static SEGMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}_]+|[^\p{L}\p{N}_\s\x1C-\x1F]").unwrap()
});

/// A run made only of digits: decimal digits (`Nd`) plus the characters whose
/// numeric type is "digit" (superscripts, subscripts, circled digits and a few
/// historic scripts). Letter-like numerals and fractions are excluded.
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[\p{Nd}",
        r"\x{B2}-\x{B3}\x{B9}\x{1369}-\x{1371}\x{19DA}\x{2070}\x{2074}-\x{2079}",
        r"\x{2080}-\x{2089}\x{2460}-\x{2468}\x{2474}-\x{247C}\x{2488}-\x{2490}",
        r"\x{24EA}\x{24F5}-\x{24FD}\x{24FF}\x{2776}-\x{277E}\x{2780}-\x{2788}",
        r"\x{278A}-\x{2792}\x{10A40}-\x{10A43}\x{10E60}-\x{10E68}",
        r"\x{11052}-\x{1105A}\x{1F100}-\x{1F10A}",
        r"]+$",
    ))
    .unwrap()
});

/// Estimate the token count of `text`.
pub fn estimate_tokens(text: &str) -> u64 {
    let text = substitute_special_sequences(text);

    let segments: u64 = SEGMENT_PATTERN
        .find_iter(&text)
        .map(|m| segment_cost(m.as_str()))
        .sum();

    let newlines = text.matches('\n').count() as u64;
    let double_spaces = text.matches("  ").count() as u64;

    segments + newlines + double_spaces
}

/// Estimate the token count of a JSON value.
///
/// Strings are counted as-is; every other value is counted over its
/// canonical row rendering.
pub fn estimate_value_tokens(value: &Value) -> Result<u64, TrialCostError> {
    match value {
        Value::String(text) => Ok(estimate_tokens(text)),
        other => Ok(estimate_tokens(&to_row_string(other)?)),
    }
}

/// Replace each special sequence with [`PLACEHOLDER`], in catalog order.
///
/// A replacement can hide or create matches for later entries.
pub fn substitute_special_sequences(text: &str) -> String {
    SPECIAL_SEQUENCES
        .iter()
        .fold(text.to_string(), |acc, seq| acc.replace(seq, PLACEHOLDER))
}

/// Cost of a single segment.
pub fn segment_cost(segment: &str) -> u64 {
    let len = segment.chars().count();
    let cost = if DIGIT_RUN.is_match(segment) {
        len / 2 + 1
    } else if len > LONG_WORD_THRESHOLD {
        len / 4 + 1
    } else {
        1
    };
    cost as u64
}
