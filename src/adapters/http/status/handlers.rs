//! Liveness and siren snapshot endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Json, State};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::EventRouter;
use crate::domain::foundation::Timestamp;
use crate::domain::siren::ActiveSiren;

#[derive(Clone)]
pub struct StatusAppState {
    pub router: Arc<EventRouter>,
    pub started_at: Instant,
}

impl StatusAppState {
    pub fn new(router: Arc<EventRouter>) -> Self {
        Self {
            router,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: Timestamp,
    /// Seconds since the process started serving.
    pub uptime: f64,
    pub active_sirens: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SirensResponse {
    pub success: bool,
    pub data: Vec<ActiveSiren>,
}

/// GET /api/health
pub async fn health(State(state): State<StatusAppState>) -> impl IntoResponse {
    Json(HealthResponse {
        success: true,
        message: "Emergency relay is running".to_string(),
        timestamp: Timestamp::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        active_sirens: state.router.sirens().len().await,
    })
}

/// GET /api/sirens
pub async fn list_sirens(State(state): State<StatusAppState>) -> impl IntoResponse {
    Json(SirensResponse {
        success: true,
        data: state.router.active_sirens().await,
    })
}
