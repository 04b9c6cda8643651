//! Location resolver: composes the pipeline.
//!
//! Single-best flow:  blank → default location | provider(1) → classify → candidate
//! Disambiguate flow: provider(max(limit, 10)) → classify + label → relevance
//!                    → proximity dedup → confidence tier → result

use super::confidence::classify;
use super::dedup::deduplicate;
use super::provider::GeocodeProvider;
use super::relevance::filter_relevant;
use super::short_name::short_name_with_fallback;
use super::tier::select_tier;
use super::types::{Candidate, DefaultLocation, DisambiguationResult, LocationError, RawCandidate};

/// Default number of candidates returned by `disambiguate`.
pub const DEFAULT_LIMIT: usize = 5;

/// Filtering and deduplication shrink the list, so never ask the provider
/// for fewer than this many records when disambiguating.
pub const MIN_PROVIDER_FETCH: usize = 10;

/// Build a [`Candidate`] from a raw record. `query` stands in for a missing
/// display name.
pub fn to_candidate(raw: &RawCandidate, query: &str) -> Candidate {
    let location_name = raw
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(query)
        .to_string();

    Candidate {
        latitude: raw.lat,
        longitude: raw.lon,
        short_name: short_name_with_fallback(raw, &location_name),
        location_name,
        confidence: classify(raw),
        location_type: raw
            .place_type
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "unknown".into()),
    }
}

/// The resolution orchestrator. Holds no per-request state.
pub struct LocationResolver<P> {
    provider: P,
    default_location: DefaultLocation,
}

impl<P: GeocodeProvider> LocationResolver<P> {
    pub fn new(provider: P, default_location: DefaultLocation) -> Self {
        Self {
            provider,
            default_location,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve a query to its single best match.
    ///
    /// A missing or blank query returns the configured default location
    /// without contacting the provider. Confidence comes from the classifier
    /// alone; no filtering or deduplication is applied.
    pub async fn resolve(&self, query: Option<&str>) -> Result<Candidate, LocationError> {
        let query = match query.map(str::trim) {
            Some(q) if !q.is_empty() => q,
            _ => {
                tracing::debug!(name = %self.default_location.name, "blank query, using default location");
                return Ok(self.default_location.to_candidate());
            }
        };

        let raw = self.provider.search(query, 1).await?;
        let first = raw
            .first()
            .ok_or_else(|| LocationError::NotFound(query.to_string()))?;

        let candidate = to_candidate(first, query);
        tracing::debug!(
            query,
            location = %candidate.location_name,
            confidence = %candidate.confidence,
            "resolved location"
        );
        Ok(candidate)
    }

    /// Find every distinct place the query may denote.
    ///
    /// A blank query yields an empty result. An empty candidate list is a
    /// valid outcome, never `NotFound`.
    pub async fn disambiguate(&self, query: &str, limit: usize) -> Result<DisambiguationResult, LocationError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(DisambiguationResult::empty(query));
        }

        let raw = self
            .provider
            .search(trimmed, limit.max(MIN_PROVIDER_FETCH))
            .await?;
        let fetched = raw.len();

        let candidates: Vec<Candidate> = raw.iter().map(|r| to_candidate(r, trimmed)).collect();
        let relevant = filter_relevant(candidates, trimmed);
        let relevant_count = relevant.len();
        let unique = deduplicate(relevant);
        let unique_count = unique.len();
        let selected = select_tier(unique, limit);

        tracing::debug!(
            query = trimmed,
            fetched,
            relevant = relevant_count,
            unique = unique_count,
            selected = selected.len(),
            "disambiguation pipeline"
        );

        Ok(DisambiguationResult::new(query, selected))
    }
}
