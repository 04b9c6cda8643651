//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Coarse reliability label for a geocoded place.
///
/// Variants are declared best-first, so `High < Medium < Low` under `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// One search hit as the geocoding provider returned it.
///
/// Only the coordinates are guaranteed; every other field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    pub lat: f64,
    pub lon: f64,
    pub display_name: Option<String>,
    /// Provider category, e.g. "city" or "building".
    pub place_type: Option<String>,
    /// Provider geometry kind, e.g. "node", "way", "relation".
    pub osm_category: Option<String>,
    pub importance: Option<f64>,
    /// Address components keyed by name ("city", "state", "country", ...).
    pub address: HashMap<String, String>,
}

impl RawCandidate {
    /// Non-blank address component, trimmed.
    pub fn address_part(&self, key: &str) -> Option<&str> {
        self.address
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// A geocoded place after classification and labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub latitude: f64,
    pub longitude: f64,
    /// Full display string from the provider.
    pub location_name: String,
    /// Concise label such as "Brooklyn, NY" or "Paris, France". Never empty.
    pub short_name: String,
    pub confidence: Confidence,
    pub location_type: String,
}

/// Configured fallback used when `resolve` receives no query.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl DefaultLocation {
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            latitude: self.lat,
            longitude: self.lon,
            location_name: self.name.clone(),
            short_name: self.name.clone(),
            confidence: Confidence::High,
            location_type: "default".into(),
        }
    }
}

/// Outcome of a multi-candidate lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisambiguationResult {
    pub query: String,
    #[serde(rename = "matches")]
    pub candidates: Vec<Candidate>,
    /// True iff more than one candidate survived selection.
    pub is_ambiguous: bool,
}

impl DisambiguationResult {
    pub fn new(query: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        let is_ambiguous = candidates.len() > 1;
        Self {
            query: query.into(),
            candidates,
            is_ambiguous,
        }
    }

    pub fn empty(query: impl Into<String>) -> Self {
        Self::new(query, Vec::new())
    }
}

/// Location resolution errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Geocoding service timed out for location: '{query}'")]
    ProviderTimeout { query: String },

    #[error("Geocoding provider error: {0}")]
    Provider(String),

    #[error("Location not found: '{0}'")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str) -> Candidate {
        Candidate {
            latitude: 0.0,
            longitude: 0.0,
            location_name: name.into(),
            short_name: name.into(),
            confidence: Confidence::Low,
            location_type: "city".into(),
        }
    }

    #[test]
    fn test_confidence_order_best_first() {
        assert!(Confidence::High < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::Low);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Confidence::Medium).unwrap(), "\"medium\"");
        assert_eq!(Confidence::High.to_string(), "high");
    }

    #[test]
    fn test_disambiguation_result_ambiguity_flag() {
        assert!(!DisambiguationResult::empty("x").is_ambiguous);
        assert!(!DisambiguationResult::new("x", vec![candidate("a")]).is_ambiguous);
        assert!(DisambiguationResult::new("x", vec![candidate("a"), candidate("b")]).is_ambiguous);
    }

    #[test]
    fn test_disambiguation_result_wire_shape() {
        let result = DisambiguationResult::new("Paris", vec![candidate("Paris, France")]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["query"], "Paris");
        assert_eq!(json["is_ambiguous"], false);
        assert_eq!(json["matches"][0]["short_name"], "Paris, France");
        assert_eq!(json["matches"][0]["confidence"], "low");
    }

    #[test]
    fn test_address_part_ignores_blank() {
        let mut raw = RawCandidate::default();
        raw.address.insert("city".into(), "  ".into());
        raw.address.insert("state".into(), " Texas ".into());
        assert_eq!(raw.address_part("city"), None);
        assert_eq!(raw.address_part("state"), Some("Texas"));
        assert_eq!(raw.address_part("country"), None);
    }

    #[test]
    fn test_default_location_candidate() {
        let def = DefaultLocation {
            name: "New York, NY".into(),
            lat: 40.7128,
            lon: -74.0060,
        };
        let c = def.to_candidate();
        assert_eq!(c.short_name, "New York, NY");
        assert_eq!(c.confidence, Confidence::High);
        assert_eq!(c.location_type, "default");
    }

    #[test]
    fn test_error_messages() {
        let e = LocationError::NotFound("atlantis".into());
        assert_eq!(e.to_string(), "Location not found: 'atlantis'");
        let e = LocationError::ProviderTimeout { query: "paris".into() };
        assert!(e.to_string().contains("timed out"));
    }
}
