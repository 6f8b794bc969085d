//! Persistence layer for the fuel stop server.
//!
//! Provides SQLite-backed storage for the station price dataset.

pub mod db;
pub mod stations;

pub use db::{init_database, Database};
pub use stations::{NewStation, SqliteStationStore};
