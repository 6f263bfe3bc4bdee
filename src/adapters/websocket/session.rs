//! Per-connection signal handling.
//!
//! A session turns inbound client signals into directory changes or relay
//! events. Malformed signals are logged and dropped; the sender never gets
//! an error back and the connection stays open.

use std::sync::Arc;

use crate::application::EventRouter;
use crate::domain::foundation::ConnectionId;
use crate::domain::incident::ReporterLocation;
use crate::domain::relay::{OutboundEvent, RelayEvent, Room};

use super::hub::{ConnectionHub, Inbox};
use super::messages::{ClientMessage, SessionMessage};

pub struct ConnectionSession {
    id: ConnectionId,
    operator: Option<String>,
    hub: Arc<ConnectionHub>,
    router: Arc<EventRouter>,
}

impl ConnectionSession {
    /// Register a connection and queue its `connected` greeting.
    pub async fn open(hub: Arc<ConnectionHub>, router: Arc<EventRouter>) -> (Self, Inbox) {
        let (id, inbox) = hub.register().await;
        hub.send(&id, SessionMessage::connected(id).into()).await;
        tracing::info!(connection_id = %id, "Client connected");

        (
            Self {
                id,
                operator: None,
                hub,
                router,
            },
            inbox,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Operator id announced on `join-admin`, if any.
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub async fn handle_text(&mut self, text: &str) {
        match ClientMessage::parse(text) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                tracing::warn!(connection_id = %self.id, error = %e, "Dropping malformed signal");
            }
        }
    }

    pub async fn handle(&mut self, message: ClientMessage) {
        tracing::trace!(connection_id = %self.id, event = message.name(), "Signal received");

        match message {
            ClientMessage::JoinUser { contact } => {
                self.hub.join(self.id, Room::reporter(&contact)).await;
            }
            ClientMessage::JoinAdmin { operator } => {
                if self.hub.join(self.id, Room::Operators).await {
                    tracing::info!(
                        connection_id = %self.id,
                        operator = operator.as_deref().unwrap_or("anonymous"),
                        "Operator joined"
                    );
                }
                self.operator = operator;
            }
            ClientMessage::JoinEmergency { incident_id } => {
                self.hub.join(self.id, Room::incident(&incident_id)).await;
            }
            ClientMessage::LocationUpdate(payload) => {
                self.relay(RelayEvent::ReporterLocation(ReporterLocation::new(payload)))
                    .await;
            }
            ClientMessage::ResponseUnitLocation(location) => {
                self.relay(RelayEvent::UnitLocation(location)).await;
            }
            ClientMessage::EmergencyStatusUpdate(change) => {
                self.relay(RelayEvent::StatusChanged(change)).await;
            }
            ClientMessage::TriggerSiren {
                incident_id,
                payload,
            } => {
                self.relay(RelayEvent::SirenTriggered {
                    incident_id,
                    payload,
                })
                .await;
            }
            ClientMessage::StopSiren { incident_id } => {
                self.relay(RelayEvent::SirenStopRequested { incident_id })
                    .await;
            }
            ClientMessage::GetActiveSirens => {
                let sirens = self.router.active_sirens().await;
                self.hub
                    .send(&self.id, OutboundEvent::ActiveSirens(sirens).into())
                    .await;
            }
            ClientMessage::Ping => {
                self.hub.send(&self.id, SessionMessage::pong().into()).await;
            }
        }
    }

    /// Unregister; no event reaches this connection afterwards.
    pub async fn close(self) {
        let rooms = self.hub.unregister(&self.id).await;
        tracing::info!(connection_id = %self.id, rooms = rooms.len(), "Client disconnected");
    }

    async fn relay(&self, event: RelayEvent) {
        self.router.route(event, Some(self.id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::messages::ServerMessage;
    use crate::application::{SirenRegistry, DEFAULT_MAX_ACTIVE};
    use crate::domain::foundation::{ContactId, IncidentId};
    use crate::domain::siren::SIREN_DURATION;

    fn stack() -> (Arc<ConnectionHub>, Arc<EventRouter>) {
        let hub = Arc::new(ConnectionHub::new());
        let sirens = SirenRegistry::new(hub.clone(), DEFAULT_MAX_ACTIVE);
        let router = Arc::new(EventRouter::new(hub.clone(), sirens, SIREN_DURATION));
        (hub, router)
    }

    fn drain(inbox: &mut Inbox) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = inbox.try_recv() {
            messages.push(message);
        }
        messages
    }

    fn names(messages: &[ServerMessage]) -> Vec<String> {
        messages
            .iter()
            .map(|m| serde_json::to_value(m).unwrap()["event"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn open_greets_with_connected() {
        let (hub, router) = stack();
        let (session, mut inbox) = ConnectionSession::open(hub.clone(), router).await;

        assert_eq!(names(&drain(&mut inbox)), vec!["connected"]);
        assert!(hub.is_connected(&session.id()).await);
    }

    #[tokio::test]
    async fn join_signals_update_directory() {
        let (hub, router) = stack();
        let (mut session, _inbox) = ConnectionSession::open(hub.clone(), router).await;

        session
            .handle_text(r#"{"event":"join-user","data":{"mobile":"9000000001"}}"#)
            .await;
        session.handle_text(r#"{"event":"join-admin","data":"desk-2"}"#).await;
        session.handle_text(r#"{"event":"join-emergency","data":"EMG1"}"#).await;

        let rooms = hub.directory().rooms_of(&session.id()).await;
        assert_eq!(rooms.len(), 3);
        assert!(rooms.contains(&Room::reporter(&ContactId::new("9000000001").unwrap())));
        assert!(rooms.contains(&Room::incident(&IncidentId::new("EMG1").unwrap())));
        assert_eq!(session.operator(), Some("desk-2"));
    }

    #[tokio::test]
    async fn malformed_signal_is_ignored_and_session_survives() {
        let (hub, router) = stack();
        let (mut session, mut inbox) = ConnectionSession::open(hub.clone(), router).await;
        drain(&mut inbox);

        session.handle_text(r#"{"event":"join-user","data":{}}"#).await;
        session.handle_text("}{").await;
        session.handle_text(r#"{"event":"ping"}"#).await;

        assert!(hub.directory().rooms_of(&session.id()).await.is_empty());
        assert_eq!(names(&drain(&mut inbox)), vec!["pong"]);
    }

    #[tokio::test]
    async fn location_update_reaches_operators_but_not_sender() {
        let (hub, router) = stack();
        let (mut reporter, mut reporter_inbox) =
            ConnectionSession::open(hub.clone(), router.clone()).await;
        let (mut operator, mut operator_inbox) =
            ConnectionSession::open(hub.clone(), router).await;
        operator.handle_text(r#"{"event":"join-admin"}"#).await;
        reporter.handle_text(r#"{"event":"join-admin"}"#).await;
        drain(&mut reporter_inbox);
        drain(&mut operator_inbox);

        reporter
            .handle_text(r#"{"event":"location-update","data":{"lat":20.1,"lng":85.8}}"#)
            .await;

        assert_eq!(names(&drain(&mut operator_inbox)), vec!["user-location-update"]);
        assert!(drain(&mut reporter_inbox).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn get_active_sirens_replies_only_to_requester() {
        let (hub, router) = stack();
        let (mut requester, mut requester_inbox) =
            ConnectionSession::open(hub.clone(), router.clone()).await;
        let (_bystander, mut bystander_inbox) =
            ConnectionSession::open(hub.clone(), router.clone()).await;
        requester
            .handle_text(r#"{"event":"trigger-siren","data":{"emergency_id":"EMG9"}}"#)
            .await;
        drain(&mut requester_inbox);
        drain(&mut bystander_inbox);

        requester.handle_text(r#"{"event":"get-active-sirens"}"#).await;

        let replies = drain(&mut requester_inbox);
        assert_eq!(names(&replies), vec!["active-sirens"]);
        let value = serde_json::to_value(&replies[0]).unwrap();
        assert_eq!(value["data"][0]["incidentId"], serde_json::json!("EMG9"));
        assert!(drain(&mut bystander_inbox).is_empty());
    }

    #[tokio::test]
    async fn close_removes_connection_everywhere() {
        let (hub, router) = stack();
        let (mut session, _inbox) = ConnectionSession::open(hub.clone(), router).await;
        session.handle_text(r#"{"event":"join-admin"}"#).await;
        let id = session.id();

        session.close().await;

        assert!(!hub.is_connected(&id).await);
        assert!(hub.directory().resolve(&Room::Operators).await.is_empty());
    }
}
