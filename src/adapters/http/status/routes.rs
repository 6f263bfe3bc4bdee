//! Route configuration for status endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{health, list_sirens, StatusAppState};

/// Routes:
/// - `GET /api/health` - Liveness with active siren count
/// - `GET /api/sirens` - Snapshot of active sirens
pub fn status_router() -> Router<StatusAppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/sirens", get(list_sirens))
}
