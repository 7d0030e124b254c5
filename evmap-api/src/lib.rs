//! evmap-api library - HTTP query service
//!
//! Thin axum plumbing over the station queries in `evmap-common`: the
//! nearby search, the by-id lookup and a health endpoint.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only usage)
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/stations", get(api::stations::nearby_stations))
        .route("/stations/:id", get(api::stations::station_detail))
        .merge(api::health::health_routes())
        // Open CORS for the dev frontend; tighten in production.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
