//! Concise place labels ("Brooklyn, NY", "Paris, France") from provider
//! address structures.
//!
//! Address layouts differ per locale, so every step has a fallback and the
//! result is never empty.

use super::types::RawCandidate;

/// Address keys that name a settlement, most specific first.
const SETTLEMENT_KEYS: &[&str] = &["city", "town", "village", "hamlet"];
/// Sub-settlement keys, used only when neither a settlement nor a display
/// name is available.
const AREA_KEYS: &[&str] = &["neighbourhood", "suburb", "county"];

const US_COUNTRY_NAMES: &[&str] = &["United States", "United States of America", "USA"];

/// US state names with their postal abbreviations.
const US_STATES: &[(&str, &str)] = &[
    ("alabama", "AL"), ("alaska", "AK"),
    ("arizona", "AZ"), ("arkansas", "AR"),
    ("california", "CA"), ("colorado", "CO"),
    ("connecticut", "CT"), ("delaware", "DE"),
    ("florida", "FL"), ("georgia", "GA"),
    ("hawaii", "HI"), ("idaho", "ID"),
    ("illinois", "IL"), ("indiana", "IN"),
    ("iowa", "IA"), ("kansas", "KS"),
    ("kentucky", "KY"), ("louisiana", "LA"),
    ("maine", "ME"), ("maryland", "MD"),
    ("massachusetts", "MA"), ("michigan", "MI"),
    ("minnesota", "MN"), ("mississippi", "MS"),
    ("missouri", "MO"), ("montana", "MT"),
    ("nebraska", "NE"), ("nevada", "NV"),
    ("new hampshire", "NH"), ("new jersey", "NJ"),
    ("new mexico", "NM"), ("new york", "NY"),
    ("north carolina", "NC"), ("north dakota", "ND"),
    ("ohio", "OH"), ("oklahoma", "OK"),
    ("oregon", "OR"), ("pennsylvania", "PA"),
    ("rhode island", "RI"), ("south carolina", "SC"),
    ("south dakota", "SD"), ("tennessee", "TN"),
    ("texas", "TX"), ("utah", "UT"),
    ("vermont", "VT"), ("virginia", "VA"),
    ("washington", "WA"), ("west virginia", "WV"),
    ("wisconsin", "WI"), ("wyoming", "WY"),
    ("district of columbia", "DC"),
];

/// Postal abbreviation for a US state name (case-insensitive).
pub fn us_state_abbreviation(state: &str) -> Option<&'static str> {
    let s = state.trim().to_lowercase();
    US_STATES
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, abbr)| *abbr)
}

fn is_us(country: &str) -> bool {
    US_COUNTRY_NAMES.iter().any(|c| c.eq_ignore_ascii_case(country))
}

/// Non-empty, trimmed comma segments of a display string.
fn segments(display_name: &str) -> Vec<&str> {
    display_name
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn settlement_token(raw: &RawCandidate, display_name: &str) -> String {
    let token = SETTLEMENT_KEYS
        .iter()
        .find_map(|k| raw.address_part(k))
        .or_else(|| segments(display_name).first().copied())
        .or_else(|| AREA_KEYS.iter().find_map(|k| raw.address_part(k)))
        .unwrap_or("Unknown");

    token.strip_prefix("City of ").unwrap_or(token).to_string()
}

/// Derive the short label for a raw record.
pub fn short_name(raw: &RawCandidate) -> String {
    short_name_with_fallback(raw, raw.display_name.as_deref().unwrap_or(""))
}

/// Like [`short_name`], degrading to `location_name` when the address
/// yields nothing usable.
pub fn short_name_with_fallback(raw: &RawCandidate, location_name: &str) -> String {
    let display_name = raw.display_name.as_deref().unwrap_or("");
    ensure_label(label_from_address(raw, display_name), location_name)
}

fn label_from_address(raw: &RawCandidate, display_name: &str) -> String {
    match raw.address_part("country") {
        Some(country) if is_us(country) => {
            let city = settlement_token(raw, display_name);
            match raw.address_part("state") {
                Some(state) => {
                    let abbr = us_state_abbreviation(state).unwrap_or(state);
                    format!("{}, {}", city, abbr)
                }
                None => format!("{}, USA", city),
            }
        }
        Some(country) => format!("{}, {}", settlement_token(raw, display_name), country),
        None => {
            let parts = segments(display_name);
            match parts.len() {
                0 => display_name.to_string(),
                1 => parts[0].to_string(),
                _ => parts[..2].join(", "),
            }
        }
    }
}

/// Guarantee a non-empty label: first segment of `location_name`, then
/// `location_name` itself, then "Unknown".
pub fn ensure_label(label: String, location_name: &str) -> String {
    if !label.trim().is_empty() {
        return label;
    }
    if let Some(first) = segments(location_name).first() {
        return first.to_string();
    }
    if !location_name.trim().is_empty() {
        return location_name.trim().to_string();
    }
    "Unknown".into()
}
