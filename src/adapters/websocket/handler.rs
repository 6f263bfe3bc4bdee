//! WebSocket upgrade handler for relay connections.
//!
//! Manages the connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Register with the hub and greet the client
//! 3. Forward the connection's outbox to the socket while feeding inbound
//!    frames to its session, until either side stops
//! 4. Unregister, dropping every room membership

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};

use crate::application::EventRouter;

use super::hub::ConnectionHub;
use super::messages::ServerMessage;
use super::session::ConnectionSession;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub hub: Arc<ConnectionHub>,
    pub router: Arc<EventRouter>,
}

impl WebSocketState {
    pub fn new(hub: Arc<ConnectionHub>, router: Arc<EventRouter>) -> Self {
        Self { hub, router }
    }
}

/// Route: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let hub = state.hub.clone();
    let (mut session, mut inbox) = ConnectionSession::open(state.hub, state.router).await;
    let connection_id = session.id();

    let mut send_task = tokio::spawn(async move {
        while let Some(message) = inbox.recv().await {
            if let Err(e) = send_message(&mut sender, &message).await {
                tracing::debug!(connection_id = %connection_id, "Send error, closing connection: {}", e);
                break;
            }
        }
    });

    // Signals from one connection are handled strictly in arrival order.
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => session.handle_text(&text).await,
                Ok(Message::Binary(_)) => {
                    tracing::warn!(connection_id = %connection_id, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            }
        }
        session
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            hub.unregister(&connection_id).await;
        }
        result = &mut recv_task => {
            send_task.abort();
            match result {
                Ok(session) => session.close().await,
                Err(_) => {
                    hub.unregister(&connection_id).await;
                }
            }
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(message).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router() -> Router<WebSocketState> {
    Router::new().route("/ws", get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{SirenRegistry, DEFAULT_MAX_ACTIVE};
    use crate::domain::siren::SIREN_DURATION;

    fn state() -> WebSocketState {
        let hub = Arc::new(ConnectionHub::new());
        let sirens = SirenRegistry::new(hub.clone(), DEFAULT_MAX_ACTIVE);
        let router = Arc::new(EventRouter::new(hub.clone(), sirens, SIREN_DURATION));
        WebSocketState::new(hub, router)
    }

    #[tokio::test]
    async fn websocket_state_shares_hub() {
        let state = state();
        let clone = state.clone();
        assert!(Arc::ptr_eq(&state.hub, &clone.hub));
        assert!(Arc::ptr_eq(&state.router, &clone.router));
    }

    #[tokio::test]
    async fn websocket_router_creates_route() {
        let _router: Router = websocket_router().with_state(state());
    }
}
