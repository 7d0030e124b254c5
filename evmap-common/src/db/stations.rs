//! Station database operations
//!
//! Write path (used by the ETL inside its transaction) and read path (used
//! by the API). The nearby search runs in two phases: a cheap rectangular
//! prefilter in SQL, then a precise haversine pass in Rust.

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::db::models::{NewStation, Station, StationDetail, StationWithDistance};
use crate::error::{Error, Result};
use crate::geo;

const STATION_COLUMNS: &str = "station_id, station_name, network, status, address, \
     city, state, zip, latitude, longitude, access, level2_ports, dcfc_ports";

/// Insert a station row, returning its assigned id.
pub async fn insert_station<'c, E>(executor: E, station: &NewStation) -> Result<i64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO stations (
            station_name, network, status, address, city, state, zip,
            latitude, longitude, access, level2_ports, dcfc_ports
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&station.station_name)
    .bind(&station.network)
    .bind(&station.status)
    .bind(&station.address)
    .bind(&station.city)
    .bind(&station.state)
    .bind(&station.zip)
    .bind(station.latitude)
    .bind(station.longitude)
    .bind(&station.access)
    .bind(station.level2_ports)
    .bind(station.dcfc_ports)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert one canonical connector tag linked to a station.
pub async fn insert_connector<'c, E>(executor: E, station_id: i64, tag: &str) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query("INSERT INTO connectors (station_id, type) VALUES (?, ?)")
        .bind(station_id)
        .bind(tag)
        .execute(executor)
        .await?;

    Ok(())
}

/// Total number of stored stations.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let total = sqlx::query_scalar("SELECT COUNT(*) FROM stations")
        .fetch_one(pool)
        .await?;

    Ok(total)
}

/// Parameters for the nearby-stations query.
///
/// Values are assumed to be pre-validated by the caller: the API layer
/// bounds `radius_km` to (0, 200] and `limit` to (1, 500], and passes
/// `connectors` already normalized to canonical spellings.
#[derive(Debug, Clone)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
    pub limit: usize,
    pub state: Option<String>,
    pub connectors: Vec<String>,
    pub dcfc_only: bool,
}

/// Find stations within `radius_km` of the center, sorted by distance.
///
/// Phase one narrows candidates with a bounding-box window plus the
/// optional state / DC-fast / connector filters, all in SQL. Phase two
/// computes the precise great-circle distance per candidate, drops the
/// corner excess the rectangle lets through, sorts ascending (stable for
/// ties) and caps the result at `limit`.
pub async fn find_nearby(
    pool: &SqlitePool,
    query: &NearbyQuery,
) -> Result<Vec<StationWithDistance>> {
    let bbox = geo::bounding_box(query.lat, query.lon, query.radius_km);

    let mut sql = format!(
        "SELECT {STATION_COLUMNS} FROM stations \
         WHERE latitude BETWEEN ? AND ? AND longitude BETWEEN ? AND ?"
    );

    if query.state.is_some() {
        sql.push_str(" AND state = ?");
    }
    if query.dcfc_only {
        sql.push_str(" AND dcfc_ports > 0");
    }
    if !query.connectors.is_empty() {
        let placeholders = vec!["?"; query.connectors.len()].join(", ");
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM connectors c \
             WHERE c.station_id = stations.station_id \
             AND c.type IN ({placeholders}))"
        ));
    }

    let mut candidates = sqlx::query_as::<_, Station>(&sql)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon);

    if let Some(state) = &query.state {
        candidates = candidates.bind(state.to_uppercase());
    }
    for tag in &query.connectors {
        candidates = candidates.bind(tag);
    }

    let rows = candidates.fetch_all(pool).await?;

    let mut results: Vec<StationWithDistance> = rows
        .into_iter()
        .map(|station| {
            let distance =
                geo::haversine_km(query.lat, query.lon, station.latitude, station.longitude);
            StationWithDistance {
                station,
                distance_km: (distance * 100.0).round() / 100.0,
            }
        })
        .filter(|entry| entry.distance_km <= query.radius_km)
        .collect();

    // Vec::sort_by is stable; equal distances keep storage order.
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results.truncate(query.limit);

    Ok(results)
}

/// Fetch a single station with its full connector-tag list.
///
/// Returns [`Error::NotFound`] when no station has the given id.
pub async fn get(pool: &SqlitePool, station_id: i64) -> Result<StationDetail> {
    let station: Option<Station> =
        sqlx::query_as(&format!(
            "SELECT {STATION_COLUMNS} FROM stations WHERE station_id = ?"
        ))
        .bind(station_id)
        .fetch_optional(pool)
        .await?;

    let station =
        station.ok_or_else(|| Error::NotFound(format!("station {station_id}")))?;

    let connectors: Vec<String> =
        sqlx::query_scalar("SELECT type FROM connectors WHERE station_id = ? ORDER BY type")
            .bind(station_id)
            .fetch_all(pool)
            .await?;

    Ok(StationDetail {
        station,
        connectors,
    })
}
