//! CSV ingestion pipeline
//!
//! Reads an AFDC-style station export and loads it into SQLite. Row-level
//! problems are soft: unusable coordinates skip the row, unparseable port
//! counts default to zero. Structural problems (unreadable file, storage
//! failure) abort the run. The whole pass executes inside one transaction,
//! so either every valid row is committed or nothing is.

use anyhow::{Context, Result};
use csv::StringRecord;
use evmap_common::connectors;
use evmap_common::db::models::NewStation;
use evmap_common::db::stations;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

/// Header-index lookup for the columns we care about. The export format
/// carries dozens of columns; absent ones are simply treated as empty.
#[derive(Debug, Default)]
struct ColumnMap {
    name: Option<usize>,
    network: Option<usize>,
    status: Option<usize>,
    address: Option<usize>,
    city: Option<usize>,
    state: Option<usize>,
    zip: Option<usize>,
    access: Option<usize>,
    level2: Option<usize>,
    dcfc: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    connector_types: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |wanted: &str| headers.iter().position(|header| header.trim() == wanted);

        Self {
            name: position("Station Name"),
            network: position("EV Network"),
            status: position("Status Code"),
            address: position("Street Address"),
            city: position("City"),
            state: position("State"),
            zip: position("ZIP"),
            access: position("Access Days Time"),
            level2: position("EV Level2 EVSE Num"),
            dcfc: position("EV DC Fast Count"),
            latitude: position("Latitude"),
            longitude: position("Longitude"),
            connector_types: position("EV Connector Types"),
        }
    }
}

/// Non-empty trimmed field at `index`, if the row has one.
fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// Port counts arrive as free text; anything unparseable counts as zero.
fn to_count(value: Option<&str>) -> i64 {
    value.and_then(|v| v.parse::<i64>().ok()).unwrap_or(0)
}

fn to_coordinate(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.parse::<f64>().ok())
}

/// Load every usable row from `csv_path` into the database.
///
/// Returns the number of stations inserted. Rows without parseable
/// coordinates are skipped and never stored.
pub async fn ingest(pool: &SqlitePool, csv_path: &Path) -> Result<u64> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open source CSV: {}", csv_path.display()))?;

    let columns = ColumnMap::from_headers(
        reader.headers().context("Failed to read CSV headers")?,
    );

    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin ingestion transaction")?;

    let mut inserted: u64 = 0;
    let mut skipped: u64 = 0;

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {line}"))?;

        let (latitude, longitude) = match (
            to_coordinate(field(&record, columns.latitude)),
            to_coordinate(field(&record, columns.longitude)),
        ) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                debug!(line, "Skipping row with missing or malformed coordinates");
                skipped += 1;
                continue;
            }
        };

        let station = NewStation {
            station_name: owned(field(&record, columns.name)),
            network: owned(field(&record, columns.network)),
            status: owned(field(&record, columns.status)),
            address: owned(field(&record, columns.address)),
            city: owned(field(&record, columns.city)),
            state: field(&record, columns.state)
                .unwrap_or_default()
                .to_uppercase(),
            zip: owned(field(&record, columns.zip)),
            latitude,
            longitude,
            access: owned(field(&record, columns.access)),
            level2_ports: to_count(field(&record, columns.level2)),
            dcfc_ports: to_count(field(&record, columns.dcfc)),
        };

        let station_id = stations::insert_station(&mut *tx, &station).await?;

        let raw_connectors = field(&record, columns.connector_types).unwrap_or_default();
        for tag in connectors::normalize(raw_connectors) {
            stations::insert_connector(&mut *tx, station_id, &tag).await?;
        }

        inserted += 1;
    }

    tx.commit()
        .await
        .context("Failed to commit ingestion transaction")?;

    if skipped > 0 {
        info!("Skipped {skipped} rows with unusable coordinates");
    }
    info!("Inserted {inserted} stations");

    Ok(inserted)
}
