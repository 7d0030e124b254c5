//! Database models for stations and connectors

use serde::Serialize;
use sqlx::FromRow;

/// One row of the `stations` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Station {
    pub station_id: i64,
    pub station_name: Option<String>,
    pub network: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub access: Option<String>,
    pub level2_ports: i64,
    pub dcfc_ports: i64,
}

/// A station record as parsed from the source data, before insertion.
///
/// Coordinates are mandatory here: rows without usable coordinates never
/// become a `NewStation` (the ingestion pipeline skips them outright).
#[derive(Debug, Clone)]
pub struct NewStation {
    pub station_name: Option<String>,
    pub network: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Uppercased two-letter code; empty string when the source omits it.
    pub state: String,
    pub zip: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub access: Option<String>,
    pub level2_ports: i64,
    pub dcfc_ports: i64,
}

/// A station with the computed great-circle distance attached.
#[derive(Debug, Clone, Serialize)]
pub struct StationWithDistance {
    #[serde(flatten)]
    pub station: Station,
    /// Distance from the query center, rounded to 2 decimal places.
    pub distance_km: f64,
}

/// Full station detail including its canonical connector tags.
#[derive(Debug, Clone, Serialize)]
pub struct StationDetail {
    #[serde(flatten)]
    pub station: Station,
    pub connectors: Vec<String>,
}
