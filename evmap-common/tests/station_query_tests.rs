//! Tests for the two-phase nearby query and the by-id lookup
//!
//! Fixtures are laid out around a center of (40.0, -105.0); latitudes are
//! offset due north/south so each station sits at an exactly known
//! great-circle distance (1 degree of latitude = R * pi / 180 km).

use evmap_common::db::init::init_schema;
use evmap_common::db::models::NewStation;
use evmap_common::db::stations::{self, NearbyQuery};
use evmap_common::Error;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

const CENTER_LAT: f64 = 40.0;
const CENTER_LON: f64 = -105.0;

/// Degrees of latitude per kilometer on the 6371 km sphere.
const DEG_PER_KM: f64 = 1.0 / 111.19492664455873;

async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    init_schema(&pool).await.expect("Should create schema");
    pool
}

fn station(name: &str, lat: f64, lon: f64) -> NewStation {
    NewStation {
        station_name: Some(name.to_string()),
        network: Some("Test Network".to_string()),
        status: Some("E".to_string()),
        address: None,
        city: Some("Boulder".to_string()),
        state: "CO".to_string(),
        zip: Some("80301".to_string()),
        latitude: lat,
        longitude: lon,
        access: None,
        level2_ports: 2,
        dcfc_ports: 0,
    }
}

async fn insert(pool: &SqlitePool, station: &NewStation, tags: &[&str]) -> i64 {
    let id = stations::insert_station(pool, station)
        .await
        .expect("Should insert station");
    for tag in tags {
        stations::insert_connector(pool, id, tag)
            .await
            .expect("Should insert connector");
    }
    id
}

fn base_query() -> NearbyQuery {
    NearbyQuery {
        lat: CENTER_LAT,
        lon: CENTER_LON,
        radius_km: 10.0,
        limit: 100,
        state: None,
        connectors: Vec::new(),
        dcfc_only: false,
    }
}

#[tokio::test]
async fn test_exact_radius_boundary() {
    let pool = memory_pool().await;

    insert(&pool, &station("in", CENTER_LAT + 9.99 * DEG_PER_KM, CENTER_LON), &[]).await;
    insert(&pool, &station("out", CENTER_LAT + 10.01 * DEG_PER_KM, CENTER_LON), &[]).await;

    let results = stations::find_nearby(&pool, &base_query()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].station.station_name.as_deref(), Some("in"));
    assert_eq!(results[0].distance_km, 9.99);
}

#[tokio::test]
async fn test_results_sorted_and_capped() {
    let pool = memory_pool().await;

    // Inserted far-to-near on purpose; output must be near-to-far.
    insert(&pool, &station("far", CENTER_LAT + 8.0 * DEG_PER_KM, CENTER_LON), &[]).await;
    insert(&pool, &station("mid", CENTER_LAT + 5.0 * DEG_PER_KM, CENTER_LON), &[]).await;
    insert(&pool, &station("near", CENTER_LAT + 2.0 * DEG_PER_KM, CENTER_LON), &[]).await;

    let mut query = base_query();
    query.limit = 2;
    let results = stations::find_nearby(&pool, &query).await.unwrap();

    assert_eq!(results.len(), 2, "count must be min(matches, limit)");
    assert_eq!(results[0].station.station_name.as_deref(), Some("near"));
    assert_eq!(results[1].station.station_name.as_deref(), Some("mid"));
    assert!(results[0].distance_km <= results[1].distance_km);
}

#[tokio::test]
async fn test_equal_distances_keep_storage_order() {
    let pool = memory_pool().await;

    // Same distance due north and due south of the center.
    insert(&pool, &station("first", CENTER_LAT + 3.0 * DEG_PER_KM, CENTER_LON), &[]).await;
    insert(&pool, &station("second", CENTER_LAT - 3.0 * DEG_PER_KM, CENTER_LON), &[]).await;

    let results = stations::find_nearby(&pool, &base_query()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].distance_km, results[1].distance_km);
    assert_eq!(results[0].station.station_name.as_deref(), Some("first"));
    assert_eq!(results[1].station.station_name.as_deref(), Some("second"));
}

#[tokio::test]
async fn test_state_filter_is_case_insensitive() {
    let pool = memory_pool().await;

    let mut colorado = station("co", CENTER_LAT + 1.0 * DEG_PER_KM, CENTER_LON);
    colorado.state = "CO".to_string();
    insert(&pool, &colorado, &[]).await;

    let mut wyoming = station("wy", CENTER_LAT + 2.0 * DEG_PER_KM, CENTER_LON);
    wyoming.state = "WY".to_string();
    insert(&pool, &wyoming, &[]).await;

    let mut query = base_query();
    query.state = Some("co".to_string());
    let results = stations::find_nearby(&pool, &query).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].station.station_name.as_deref(), Some("co"));
}

#[tokio::test]
async fn test_dcfc_only_excludes_zero_port_stations() {
    let pool = memory_pool().await;

    let mut fast = station("fast", CENTER_LAT + 1.0 * DEG_PER_KM, CENTER_LON);
    fast.dcfc_ports = 4;
    insert(&pool, &fast, &["CCS"]).await;

    // Within radius and matching everything else, but no DC fast ports.
    insert(&pool, &station("slow", CENTER_LAT + 2.0 * DEG_PER_KM, CENTER_LON), &["CCS"]).await;

    let mut query = base_query();
    query.dcfc_only = true;
    let results = stations::find_nearby(&pool, &query).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].station.station_name.as_deref(), Some("fast"));
}

#[tokio::test]
async fn test_connector_filter_has_or_semantics() {
    let pool = memory_pool().await;

    insert(
        &pool,
        &station("chademo only", CENTER_LAT + 1.0 * DEG_PER_KM, CENTER_LON),
        &["CHADEMO"],
    )
    .await;
    insert(
        &pool,
        &station("tesla only", CENTER_LAT + 2.0 * DEG_PER_KM, CENTER_LON),
        &["TESLA/NACS"],
    )
    .await;

    let mut query = base_query();
    query.connectors = vec!["CCS".to_string(), "CHADEMO".to_string()];
    let results = stations::find_nearby(&pool, &query).await.unwrap();

    // "has ANY of", not "has ALL of"
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].station.station_name.as_deref(),
        Some("chademo only")
    );
}

#[tokio::test]
async fn test_no_candidates_is_empty_not_error() {
    let pool = memory_pool().await;

    let results = stations::find_nearby(&pool, &base_query()).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_get_returns_full_detail() {
    let pool = memory_pool().await;

    let id = insert(
        &pool,
        &station("detail", CENTER_LAT, CENTER_LON),
        &["CCS", "J1772"],
    )
    .await;

    let detail = stations::get(&pool, id).await.unwrap();
    assert_eq!(detail.station.station_id, id);
    assert_eq!(detail.station.station_name.as_deref(), Some("detail"));
    assert_eq!(detail.connectors, vec!["CCS", "J1772"]);
}

#[tokio::test]
async fn test_get_missing_station_is_not_found() {
    let pool = memory_pool().await;

    let result = stations::get(&pool, 4242).await;
    assert!(matches!(result, Err(Error::NotFound(_))), "got {result:?}");
}
