//! evmap-api - EV charging station query service
//!
//! Serves the nearby-stations search and the by-id lookup over HTTP.
//! The query path is read-only; the dataset is loaded separately by
//! evmap-etl.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use evmap_api::{build_router, AppState};

/// Command-line arguments for evmap-api
#[derive(Parser, Debug)]
#[command(name = "evmap-api")]
#[command(about = "EV charging station query API")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "EVMAP_PORT")]
    port: u16,

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

    info!("Starting evmap-api v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {}", args.database.display());

    let pool = evmap_common::db::init_database(&args.database)
        .await
        .context("Failed to initialize database")?;

    let station_count = evmap_common::db::stations::count(&pool)
        .await
        .context("Failed to query station count")?;
    info!("Serving {station_count} stations");

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("evmap-api listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
