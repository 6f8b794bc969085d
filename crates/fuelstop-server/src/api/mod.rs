//! HTTP API for the fuel stop server.

pub mod error;
pub mod fuel;
pub mod request_id;
mod routes;
pub mod trips;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub use error::ApiError;

pub fn routes() -> Router<Arc<AppState>> {
    routes::create_router()
}

/// Routes with state and middleware applied, ready to serve.
pub fn app(state: Arc<AppState>) -> Router {
    routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_id::ensure_request_id))
}
