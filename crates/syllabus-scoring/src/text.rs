//! Tokenization shared by query profiling and confidence estimation.

use regex::Regex;
use std::sync::LazyLock;

/// Letters and digits; punctuation and whitespace separate tokens.
static TOKEN_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").ok());

/// Standalone numerals, including decimals ("3", "12,5", "0.75").
static NUMERAL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:[.,]\d+)?\b").ok());

/// Lowercased word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    match TOKEN_RE.as_ref() {
        Some(re) => re
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect(),
        None => text
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect(),
    }
}

/// Tokens in original case.
pub fn raw_tokens(text: &str) -> Vec<&str> {
    match TOKEN_RE.as_ref() {
        Some(re) => re.find_iter(text).map(|m| m.as_str()).collect(),
        None => text.split_whitespace().collect(),
    }
}

/// Numerals appearing in `text`.
pub fn numerals(text: &str) -> Vec<&str> {
    match NUMERAL_RE.as_ref() {
        Some(re) => re.find_iter(text).map(|m| m.as_str()).collect(),
        None => Vec::new(),
    }
}

/// All digit runs parsed as integers, in order.
pub fn integers(text: &str) -> Vec<u64> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect()
}
