//! Geocoding provider adapter: Nominatim search over async HTTP.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::types::{LocationError, RawCandidate};
use crate::config::Settings;

/// A source of raw geocoder hits.
///
/// Implementations return the provider's records in provider order. An empty
/// or whitespace-only query yields an empty list without any I/O.
pub trait GeocodeProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RawCandidate>, LocationError>> + Send;
}

// ─── Wire format ────────────────────────────────────────────────

/// Nominatim encodes coordinates as strings; other deployments use numbers.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

/// One element of the `/search?format=json` response.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct NominatimPlace {
    #[serde(default)]
    pub lat: Option<Coordinate>,
    #[serde(default)]
    pub lon: Option<Coordinate>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    #[serde(default)]
    pub osm_type: Option<String>,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub address: Option<HashMap<String, serde_json::Value>>,
}

impl NominatimPlace {
    /// Convert to a [`RawCandidate`], or `None` when the coordinates are
    /// missing, non-numeric, or out of range.
    pub fn into_raw(self) -> Option<RawCandidate> {
        let lat = self.lat.as_ref().and_then(Coordinate::value)?;
        let lon = self.lon.as_ref().and_then(Coordinate::value)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        let address = self
            .address
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();

        Some(RawCandidate {
            lat,
            lon,
            display_name: self.display_name,
            place_type: self.place_type,
            osm_category: self.osm_type,
            importance: self.importance,
            address,
        })
    }
}

/// Convert a whole response, dropping unusable records.
///
/// Fails only if there were records and none of them had usable coordinates.
pub fn places_to_raw(query: &str, places: Vec<NominatimPlace>) -> Result<Vec<RawCandidate>, LocationError> {
    let total = places.len();
    let raw: Vec<RawCandidate> = places
        .into_iter()
        .filter_map(|p| {
            let name = p.display_name.clone();
            let converted = p.into_raw();
            if converted.is_none() {
                tracing::warn!(query, display_name = ?name, "dropping provider record without usable coordinates");
            }
            converted
        })
        .collect();

    if total > 0 && raw.is_empty() {
        return Err(LocationError::Provider(format!(
            "none of {} results for '{}' had usable coordinates",
            total, query
        )));
    }
    Ok(raw)
}

// ─── Nominatim provider ─────────────────────────────────────────

/// OpenStreetMap Nominatim (or any API-compatible deployment).
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: Client,
    base_url: String,
}

impl NominatimProvider {
    /// Build a provider with its own HTTP client. `timeout` bounds each call.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| LocationError::Provider(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, LocationError> {
        Self::new(
            &settings.nominatim_base_url,
            Duration::from_secs(settings.timeout_secs),
            &settings.user_agent,
        )
    }

}

fn map_transport_error(query: &str, err: reqwest::Error) -> LocationError {
    if err.is_timeout() {
        tracing::warn!(query, "geocoding provider timed out");
        LocationError::ProviderTimeout {
            query: query.to_string(),
        }
    } else {
        tracing::warn!(query, error = %err, "geocoding provider request failed");
        LocationError::Provider(err.to_string())
    }
}

impl GeocodeProvider for NominatimProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RawCandidate>, LocationError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.base_url);
        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .map_err(|e| map_transport_error(query, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(query, status = status.as_u16(), "geocoding provider returned error status");
            return Err(LocationError::Provider(format!(
                "unexpected HTTP status {} from {}",
                status.as_u16(),
                url
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| map_transport_error(query, e))?;

        tracing::debug!(query, results = places.len(), "geocoding provider responded");
        places_to_raw(query, places)
    }
}
