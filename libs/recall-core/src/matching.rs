//! Answer matching for typed-answer quiz sessions.

/// Normalize an answer for comparison: trim surrounding whitespace and
/// case-fold.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Compare a typed answer against the expected definition.
///
/// Exact string equality after normalization; no partial credit.
pub fn answers_match(typed: &str, correct: &str) -> bool {
    normalize_answer(typed) == normalize_answer(correct)
}
