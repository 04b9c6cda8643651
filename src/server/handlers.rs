use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{Candidate, DisambiguationResult, LocationError, DEFAULT_LIMIT};

use super::state::AppState;

/// Largest `limit` a caller may ask `disambiguate` for.
const MAX_LIMIT: usize = 50;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<LocationError> for ApiError {
    fn from(e: LocationError) -> Self {
        let status = match &e {
            LocationError::NotFound(_) => StatusCode::NOT_FOUND,
            LocationError::ProviderTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            LocationError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        api_error(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        api_error(StatusCode::BAD_REQUEST, e.body_text())
    }
}

// ─── GET /api/health ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "placefinder",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─── POST /api/location/resolve ──────────────────────────────────

#[derive(Deserialize)]
pub struct LocationInput {
    #[serde(default)]
    pub location: Option<String>,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LocationInput>, JsonRejection>,
) -> Result<Json<Candidate>, ApiError> {
    let start = Instant::now();
    let Json(input) = body?;
    let query = input.location.as_deref();

    let candidate = match state.resolver.resolve(query).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(query = ?query, error = %e, "resolve failed");
            return Err(e.into());
        }
    };

    tracing::info!(
        query = ?query,
        location = %candidate.location_name,
        confidence = %candidate.confidence,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/location/resolve"
    );
    Ok(Json(candidate))
}

// ─── POST /api/location/disambiguate ─────────────────────────────

#[derive(Deserialize)]
pub struct DisambiguateInput {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn disambiguate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DisambiguateInput>, JsonRejection>,
) -> Result<Json<DisambiguationResult>, ApiError> {
    let start = Instant::now();
    let Json(input) = body?;

    let limit = input.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("limit must be between 1 and {}", MAX_LIMIT),
        ));
    }

    let query = input.location.unwrap_or_default();
    let result = match state.resolver.disambiguate(&query, limit).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(query = %query, error = %e, "disambiguate failed");
            return Err(e.into());
        }
    };

    tracing::info!(
        query = %query,
        matches = result.candidates.len(),
        ambiguous = result.is_ambiguous,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/location/disambiguate"
    );
    Ok(Json(result))
}
