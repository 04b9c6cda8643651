//! Confidence-tiered selection.
//!
//! Only the best populated tier is returned: one confident match is never
//! buried under noisier entries, and ambiguity is judged within a tier.

use super::types::{Candidate, Confidence};

const TIERS: [Confidence; 3] = [Confidence::High, Confidence::Medium, Confidence::Low];

/// Best confidence tier present in `candidates`, if any.
pub fn best_tier(candidates: &[Candidate]) -> Option<Confidence> {
    TIERS
        .into_iter()
        .find(|tier| candidates.iter().any(|c| c.confidence == *tier))
}

/// Keep up to `limit` candidates of the best populated tier, in input order.
pub fn select_tier(candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    let Some(tier) = best_tier(&candidates) else {
        return Vec::new();
    };

    candidates
        .into_iter()
        .filter(|c| c.confidence == tier)
        .take(limit)
        .collect()
}
