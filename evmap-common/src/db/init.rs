//! Database initialization
//!
//! Opens (or creates) the SQLite database and brings up the two-table
//! schema. All statements are idempotent, so the ETL and the API can both
//! call this unconditionally on startup.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    init_schema(&pool).await?;

    Ok(pool)
}

/// Apply pragmas and create the schema on an existing pool.
///
/// Split out from [`init_database`] so tests can run against in-memory
/// databases.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys (connectors cascade-delete with their station)
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    create_stations_table(pool).await?;
    create_connectors_table(pool).await?;

    Ok(())
}

async fn create_stations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stations (
            station_id INTEGER PRIMARY KEY AUTOINCREMENT,
            station_name TEXT,
            network TEXT,
            status TEXT,
            address TEXT,
            city TEXT,
            state TEXT,
            zip TEXT,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            access TEXT,
            level2_ports INTEGER NOT NULL DEFAULT 0,
            dcfc_ports INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_connectors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS connectors (
            connector_id INTEGER PRIMARY KEY AUTOINCREMENT,
            station_id INTEGER NOT NULL
                REFERENCES stations(station_id) ON DELETE CASCADE,
            type TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_connectors_station_id
         ON connectors(station_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
