//! Text normalization ahead of vectorization.
//!
//! Deterministic and idempotent: normalizing already-normalized text
//! yields the same string.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is neither a word character nor whitespace.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// A run of whitespace of any length.
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw extracted text into a single string of space-separated
/// lowercase tokens: strip punctuation, collapse whitespace, trim,
/// lowercase, split on word boundaries, rejoin with single spaces.
///
/// Empty or whitespace-only input yields an empty string.
pub fn normalize_text(raw: &str) -> String {
    let stripped = NON_WORD.replace_all(raw, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    let lowered = collapsed.trim().to_lowercase();

    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}
