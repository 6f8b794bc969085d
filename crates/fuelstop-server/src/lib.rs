//! Shared library surface for the fuel stop server, its binaries and tests.

pub mod api;
pub mod cache;
pub mod config;
pub mod geocoding;
pub mod import;
pub mod loops;
pub mod persistence;
pub mod routing;
pub mod state;
