//! Relay assembly: one owned instance of every shared component, and the
//! HTTP/WebSocket router built on top of it.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::http::{emergency_router, status_router, EmergencyAppState, StatusAppState};
use crate::adapters::memory::InMemoryIncidentStore;
use crate::adapters::websocket::{websocket_router, ConnectionHub, WebSocketState};
use crate::application::{EventRouter, SirenRegistry};
use crate::config::{ServerConfig, SirenConfig};
use crate::ports::IncidentStore;

/// The relay's shared state, constructed once at startup.
///
/// The hub (with its room directory) and the siren registry are the only
/// mutable shared state. Both are injected into the router and sessions.
#[derive(Clone)]
pub struct RelayServices {
    pub hub: Arc<ConnectionHub>,
    pub sirens: SirenRegistry,
    pub router: Arc<EventRouter>,
    pub store: Arc<dyn IncidentStore>,
}

impl RelayServices {
    pub fn new(sirens: &SirenConfig, store: Arc<dyn IncidentStore>) -> Self {
        Self::with_duration(sirens.duration(), sirens.max_active, store)
    }

    /// Services backed by the in-process incident store.
    pub fn in_memory(sirens: &SirenConfig) -> Self {
        Self::new(sirens, Arc::new(InMemoryIncidentStore::new()))
    }

    pub fn with_duration(
        siren_duration: Duration,
        max_active: usize,
        store: Arc<dyn IncidentStore>,
    ) -> Self {
        let hub = Arc::new(ConnectionHub::new());
        let sirens = SirenRegistry::new(hub.clone(), max_active);
        let router = Arc::new(EventRouter::new(hub.clone(), sirens.clone(), siren_duration));

        Self {
            hub,
            sirens,
            router,
            store,
        }
    }

    /// Stop every pending siren timer.
    pub async fn shutdown(&self) {
        self.sirens.shutdown().await;
    }
}

/// Build the complete Axum router.
///
/// - `GET /ws` - relay WebSocket
/// - `POST /api/emergency`, `GET /api/emergency/:id`, `PUT /api/emergency/:id/status`
/// - `GET /api/emergencies`, `GET /api/emergencies/department/:department`,
///   `GET /api/user/emergencies/:mobile`, `GET /api/emergency/:id/logs`
/// - `GET /api/sirens`, `GET /api/health`
pub fn build_router(services: &RelayServices, server: &ServerConfig) -> Router {
    Router::new()
        .merge(
            websocket_router()
                .with_state(WebSocketState::new(services.hub.clone(), services.router.clone())),
        )
        .merge(emergency_router().with_state(EmergencyAppState::new(
            services.store.clone(),
            services.router.clone(),
        )))
        .merge(status_router().with_state(StatusAppState::new(services.router.clone())))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Any origin unless `cors_origins` lists some.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
