//! Confidence classification for raw geocoder hits.
//!
//! Provider importance is consulted first; place-type heuristics cover
//! records that lack it. Rules are evaluated top to bottom, first match wins.

use super::types::{Confidence, RawCandidate};

/// Importance at or above which any record is high confidence.
pub const HIGH_IMPORTANCE: f64 = 0.7;
/// Importance at or above which a `city` record is high confidence.
pub const CITY_IMPORTANCE: f64 = 0.5;

/// Point-like categories: a building or street address is a precise match.
const PRECISE_TYPES: &[&str] = &["building", "house", "residential"];
/// Settlement-scale categories.
const SETTLEMENT_TYPES: &[&str] = &["town", "village", "neighbourhood", "suburb"];

/// Classify a raw record.
pub fn classify(raw: &RawCandidate) -> Confidence {
    classify_parts(
        raw.place_type.as_deref().unwrap_or(""),
        raw.osm_category.as_deref().unwrap_or(""),
        raw.importance,
    )
}

/// Classification over the three inputs that matter. Categories compare
/// case-insensitively.
pub fn classify_parts(place_type: &str, osm_category: &str, importance: Option<f64>) -> Confidence {
    let importance = importance.unwrap_or(0.0);
    let place_type = place_type.to_ascii_lowercase();
    let place_type = place_type.as_str();
    let osm_category = osm_category.to_ascii_lowercase();

    if importance >= HIGH_IMPORTANCE {
        return Confidence::High;
    }
    if place_type == "city" && importance >= CITY_IMPORTANCE {
        return Confidence::High;
    }
    if PRECISE_TYPES.contains(&place_type) || osm_category == "way" {
        return Confidence::High;
    }
    if SETTLEMENT_TYPES.contains(&place_type) {
        return Confidence::Medium;
    }
    Confidence::Low
}
