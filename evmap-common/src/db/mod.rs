//! Database schema, models and station queries

pub mod init;
pub mod models;
pub mod stations;

pub use init::{init_database, init_schema};
pub use models::{NewStation, Station, StationDetail, StationWithDistance};
