//! Text cleanup helpers: whitespace normalization for extracted document
//! text and naive sentence-level deduplication for aggregated summaries.

use std::collections::BTreeSet;

/// Collapse all whitespace runs (including newlines) to single spaces and
/// trim the ends. Extracted PDF text arrives full of hard wraps and column
/// artifacts; the model does better on a single-spaced stream.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove exact-duplicate `". "`-delimited sentences from `text`.
///
/// Fragments are trimmed and canonicalized by stripping one trailing period
/// before comparison, so the final sentence of one summary deduplicates
/// against a mid-string copy of itself. Surviving sentences come back in
/// canonical (sorted) order, not input order; the trailing period is
/// restored iff the input ended with one.
///
/// This is knowingly approximate. Abbreviations and decimal points split
/// badly, and ordering is lost. Near-duplicate generated text is the target,
/// not prose fidelity.
pub fn dedupe_sentences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let ends_with_period = trimmed.ends_with('.');

    let mut sentences: BTreeSet<&str> = BTreeSet::new();
    for fragment in trimmed.split(". ") {
        let fragment = fragment.trim();
        let sentence = fragment.strip_suffix('.').unwrap_or(fragment);
        if !sentence.is_empty() {
            sentences.insert(sentence);
        }
    }

    let mut out = sentences.into_iter().collect::<Vec<_>>().join(". ");
    if ends_with_period && !out.is_empty() {
        out.push('.');
    }
    out
}
