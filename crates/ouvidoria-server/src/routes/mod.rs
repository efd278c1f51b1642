//! HTTP route handlers.
//!
//! `/process` and `/health` are served at the root; the same handlers are
//! mounted under `/api/ouvidoria` for the browser UI, next to `/api/horario`.

pub mod horario;
pub mod ouvidoria;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(ouvidoria::root_routes())
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/ouvidoria", ouvidoria::routes())
        .nest("/horario", horario::routes())
}
