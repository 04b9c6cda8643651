//! Text relevance filter.
//!
//! Geocoders sometimes return places that are geographically near the
//! intended one but textually unrelated (a containing region, a nearby
//! landmark). A candidate survives only if its labels share text with the
//! query.

use std::collections::HashSet;

use super::types::Candidate;

/// Whether `candidate` textually matches `query`.
///
/// Matches when the trimmed, lower-cased query is a substring of
/// `short_name + " " + location_name`, or when the two share at least one
/// whitespace-separated token.
pub fn is_relevant(candidate: &Candidate, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    let text = format!("{} {}", candidate.short_name, candidate.location_name).to_lowercase();

    if text.contains(&q) {
        return true;
    }

    let text_tokens: HashSet<&str> = text.split_whitespace().collect();
    q.split_whitespace().any(|t| text_tokens.contains(t))
}

/// Keep only the candidates relevant to `query`, preserving order.
///
/// May return an empty list; no attempt is made to rescue anything.
pub fn filter_relevant(candidates: Vec<Candidate>, query: &str) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| is_relevant(c, query))
        .collect()
}
