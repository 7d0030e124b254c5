//! # EvMap Common Library
//!
//! Shared code for the evmap services:
//! - Error types
//! - Connector-type normalization
//! - Geodesic helpers (haversine, bounding box)
//! - Database schema, models and station queries

pub mod connectors;
pub mod db;
pub mod error;
pub mod geo;

pub use error::{Error, Result};
