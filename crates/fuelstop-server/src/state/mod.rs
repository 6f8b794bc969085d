//! Application state shared by every request handler.

pub mod store;

pub use store::{AppState, StationCacheHandle};
