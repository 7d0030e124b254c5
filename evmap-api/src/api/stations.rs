//! Station query endpoints
//!
//! The nearby search and the by-id lookup. Radius and limit bounds are
//! enforced here at the boundary; the query engine underneath assumes
//! already-validated inputs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use serde_json::json;

use evmap_common::connectors;
use evmap_common::db::models::{StationDetail, StationWithDistance};
use evmap_common::db::stations::{self, NearbyQuery};
use evmap_common::Error;

use crate::AppState;

/// Query parameters for GET /stations
#[derive(Debug, Deserialize)]
pub struct StationsParams {
    /// Center latitude in degrees
    pub lat: f64,

    /// Center longitude in degrees
    pub lon: f64,

    /// Search radius in kilometers, bounded to (0, 200]
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,

    /// Maximum number of results, bounded to (1, 500]
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Optional two-letter state filter (case-insensitive)
    pub state: Option<String>,

    /// Connector filter; repeatable and/or comma-separated
    /// (`?connector=CCS&connector=CHADEMO` or `?connector=CCS,CHADEMO`)
    #[serde(default)]
    pub connector: Vec<String>,

    /// Keep only stations with at least one DC fast port
    #[serde(default)]
    pub dcfc_only: bool,
}

fn default_radius_km() -> f64 {
    10.0
}

fn default_limit() -> i64 {
    100
}

/// Response body for GET /stations
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub count: usize,
    pub results: Vec<StationWithDistance>,
}

/// GET /stations?lat=..&lon=..&radius_km=..&limit=..
///
/// Find stations near a coordinate, sorted by distance.
pub async fn nearby_stations(
    State(state): State<AppState>,
    Query(params): Query<StationsParams>,
) -> Result<Json<StationsResponse>, StationsError> {
    if !(params.radius_km > 0.0 && params.radius_km <= 200.0) {
        return Err(StationsError::InvalidRadius(params.radius_km));
    }
    if !(params.limit > 1 && params.limit <= 500) {
        return Err(StationsError::InvalidLimit(params.limit));
    }

    let query = NearbyQuery {
        lat: params.lat,
        lon: params.lon,
        radius_km: params.radius_km,
        limit: params.limit as usize,
        state: params.state,
        connectors: connectors::normalize_filter_values(&params.connector),
        dcfc_only: params.dcfc_only,
    };

    let results = stations::find_nearby(&state.db, &query).await?;

    Ok(Json(StationsResponse {
        count: results.len(),
        results,
    }))
}

/// GET /stations/:id
///
/// Full station detail including its connector-tag list.
pub async fn station_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StationDetail>, StationsError> {
    let detail = stations::get(&state.db, id).await?;
    Ok(Json(detail))
}

/// Station endpoint errors
#[derive(Debug)]
pub enum StationsError {
    InvalidRadius(f64),
    InvalidLimit(i64),
    NotFound,
    Database(String),
}

impl From<Error> for StationsError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(_) => StationsError::NotFound,
            other => StationsError::Database(other.to_string()),
        }
    }
}

impl IntoResponse for StationsError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            StationsError::InvalidRadius(value) => (
                StatusCode::BAD_REQUEST,
                format!("radius_km must be in (0, 200], got {value}"),
            ),
            StationsError::InvalidLimit(value) => (
                StatusCode::BAD_REQUEST,
                format!("limit must be in (1, 500], got {value}"),
            ),
            StationsError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            StationsError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {msg}"),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
