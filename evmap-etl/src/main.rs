//! evmap-etl - Station dataset loader
//!
//! Batch tool that loads an AFDC-style CSV export of EV charging stations
//! into the evmap SQLite database. Intended as an offline job with no
//! concurrent writers; re-running it appends the dataset again rather than
//! merging (delete the database file first for a clean reload).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use evmap_etl::ingest;

/// Command-line arguments for evmap-etl
#[derive(Parser, Debug)]
#[command(name = "evmap-etl")]
#[command(about = "Load an EV charging station CSV export into SQLite")]
#[command(version)]
struct Args {
    /// Path to the station CSV export
    #[arg(short, long, env = "EVMAP_CSV", default_value = "data/afdc_stations.csv")]
    csv: PathBuf,

    /// Path to the SQLite database file
    #[arg(short, long, env = "EVMAP_DB", default_value = "data/ev.db")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting evmap-etl v{}", env!("CARGO_PKG_VERSION"));
    info!("Source CSV: {}", args.csv.display());
    info!("Database: {}", args.database.display());

    let pool = evmap_common::db::init_database(&args.database)
        .await
        .context("Failed to initialize database")?;

    let inserted = ingest::ingest(&pool, &args.csv).await?;

    let total = evmap_common::db::stations::count(&pool)
        .await
        .context("Failed to count stations")?;
    info!("Ingestion complete: {inserted} stations inserted ({total} total in database)");

    Ok(())
}
