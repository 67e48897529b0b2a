// src/export/classify.rs

//! Stderr relevance classification.
//!
//! The compiler sometimes exits with code 0 while printing error-shaped
//! diagnostics on stderr. This module decides which accumulated stderr lines
//! are worth surfacing in the terminal error message. It is used *only* for
//! that message; progress forwarding is never filtered through it.

use std::sync::LazyLock;

use regex::RegexSet;

/// Fixed, ordered set of case-insensitive patterns used to rank stderr lines
/// by relevance.
pub const ERROR_SIGNATURE_PATTERNS: &[&str] = &[
    "error",
    "exception",
    "failed",
    "not found",
    "cannot",
    "missing",
    "stack",
];

/// At most this many lines make it into the terminal error message.
const MAX_RELEVANT_LINES: usize = 5;

const LINE_DELIMITER: &str = " | ";

static SIGNATURE_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(
        ERROR_SIGNATURE_PATTERNS
            .iter()
            .map(|pattern| format!("(?i){}", regex::escape(pattern))),
    )
    // Escaped literal patterns; compilation is exercised by the tests.
    .expect("error signature patterns must compile")
});

/// Extract the error-relevant portion of an accumulated stderr buffer.
///
/// - Empty or whitespace-only buffers yield an empty string.
/// - Lines matching at least one signature pattern are preferred; when no
///   line looks error-shaped, *every* remaining line is treated as
///   potentially relevant rather than silently approving the invocation.
/// - At most the first five chosen lines are joined with `" | "`.
///
/// Pure and deterministic given its input.
pub fn extract_relevant_stderr(buffer: &str) -> String {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    // Split on any newline convention and drop blank lines.
    let lines: Vec<&str> = trimmed
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let matching: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| SIGNATURE_SET.is_match(line))
        .collect();

    let chosen = if matching.is_empty() { &lines } else { &matching };

    chosen
        .iter()
        .take(MAX_RELEVANT_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join(LINE_DELIMITER)
}
