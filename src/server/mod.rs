//! Thin HTTP surface over the resolver.

mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::Settings;
use crate::location::{LocationError, LocationResolver, NominatimProvider};

pub use state::AppState;

/// Build the router for the configured provider.
pub fn build_router(settings: &Settings) -> Result<Router, LocationError> {
    let provider = NominatimProvider::from_settings(settings)?;
    let state = Arc::new(AppState {
        resolver: LocationResolver::new(provider, settings.default_location.clone()),
    });
    Ok(router_with_state(state))
}

pub fn router_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/location/resolve", post(handlers::resolve))
        .route("/api/location/disambiguate", post(handlers::disambiguate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until the process is stopped.
pub async fn start(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(settings)?;
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;

    tracing::info!(
        addr = %settings.bind_addr,
        provider = %settings.nominatim_base_url,
        default_location = %settings.default_location.name,
        "placefinder server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
