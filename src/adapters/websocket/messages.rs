//! WebSocket message types for the relay channel.
//!
//! Every frame in either direction is a JSON object
//! `{"event": "<kebab-name>", "data": <payload>}`:
//! - Server → Client: relayed events, connection status, pongs
//! - Client → Server: joins, location reports, status changes, siren control
//!
//! Identifiers may arrive as a bare string or inside an object, in
//! camelCase or snake_case, matching what existing console clients send.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::domain::foundation::{ConnectionId, ContactId, IncidentId, Timestamp, ValidationError};
use crate::domain::incident::{StatusChange, UnitLocation};
use crate::domain::relay::OutboundEvent;

// ============================================
// Server → Client Messages
// ============================================

/// Anything written to a client socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Event produced by the router or siren registry.
    Relay(OutboundEvent),
    /// Connection-level bookkeeping.
    Session(SessionMessage),
}

impl From<OutboundEvent> for ServerMessage {
    fn from(event: OutboundEvent) -> Self {
        ServerMessage::Relay(event)
    }
}

impl From<SessionMessage> for ServerMessage {
    fn from(message: SessionMessage) -> Self {
        ServerMessage::Session(message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SessionMessage {
    /// Sent once after the socket is registered.
    Connected(ConnectedMessage),
    /// Heartbeat response.
    Pong(PongMessage),
}

impl SessionMessage {
    pub fn connected(connection_id: ConnectionId) -> Self {
        SessionMessage::Connected(ConnectedMessage {
            connection_id: connection_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn pong() -> Self {
        SessionMessage::Pong(PongMessage {
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// A validated inbound signal.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    JoinUser { contact: ContactId },
    /// The operator id is informational only.
    JoinAdmin { operator: Option<String> },
    JoinEmergency { incident_id: IncidentId },
    LocationUpdate(JsonValue),
    ResponseUnitLocation(UnitLocation),
    EmergencyStatusUpdate(StatusChange),
    TriggerSiren { incident_id: IncidentId, payload: JsonValue },
    StopSiren { incident_id: IncidentId },
    GetActiveSirens,
    Ping,
}

/// Why an inbound frame was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientMessageError {
    #[error("frame is not a valid event envelope: {0}")]
    InvalidFrame(String),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: JsonValue,
}

const INCIDENT_ID_KEYS: [&str; 2] = ["emergencyId", "emergency_id"];
const CONTACT_KEYS: [&str; 3] = ["mobile", "mobileNumber", "mobile_number"];

impl ClientMessage {
    /// Parses and validates one text frame.
    pub fn parse(text: &str) -> Result<Self, ClientMessageError> {
        let envelope: Envelope = serde_json::from_str(text)
            .map_err(|e| ClientMessageError::InvalidFrame(e.to_string()))?;
        Self::from_parts(&envelope.event, envelope.data)
    }

    pub fn from_parts(event: &str, data: JsonValue) -> Result<Self, ClientMessageError> {
        let message = match event {
            "join-user" => ClientMessage::JoinUser {
                contact: ContactId::new(required_string(&data, &CONTACT_KEYS, "mobile")?)?,
            },
            "join-admin" => ClientMessage::JoinAdmin {
                operator: scalar_string(&data).filter(|s| !s.trim().is_empty()),
            },
            "join-emergency" => ClientMessage::JoinEmergency {
                incident_id: incident_id(&data)?,
            },
            "location-update" => ClientMessage::LocationUpdate(data),
            "response-unit-location" => {
                ClientMessage::ResponseUnitLocation(UnitLocation::from_payload(data)?)
            }
            "emergency-status-update" => ClientMessage::EmergencyStatusUpdate(status_change(&data)?),
            "trigger-siren" => ClientMessage::TriggerSiren {
                incident_id: incident_id(&data)?,
                payload: data,
            },
            "stop-siren" => ClientMessage::StopSiren {
                incident_id: incident_id(&data)?,
            },
            "get-active-sirens" => ClientMessage::GetActiveSirens,
            "ping" => ClientMessage::Ping,
            other => return Err(ClientMessageError::UnknownEvent(other.to_string())),
        };
        Ok(message)
    }

    /// Wire name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::JoinUser { .. } => "join-user",
            ClientMessage::JoinAdmin { .. } => "join-admin",
            ClientMessage::JoinEmergency { .. } => "join-emergency",
            ClientMessage::LocationUpdate(_) => "location-update",
            ClientMessage::ResponseUnitLocation(_) => "response-unit-location",
            ClientMessage::EmergencyStatusUpdate(_) => "emergency-status-update",
            ClientMessage::TriggerSiren { .. } => "trigger-siren",
            ClientMessage::StopSiren { .. } => "stop-siren",
            ClientMessage::GetActiveSirens => "get-active-sirens",
            ClientMessage::Ping => "ping",
        }
    }
}

/// String or number rendered as a string.
fn scalar_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First of `keys` present on an object, or the value itself when scalar.
fn required_string(
    data: &JsonValue,
    keys: &[&str],
    field: &str,
) -> Result<String, ValidationError> {
    if let Some(s) = scalar_string(data) {
        return Ok(s);
    }
    keys.iter()
        .find_map(|key| data.get(*key))
        .ok_or_else(|| ValidationError::missing_field(field))
        .and_then(|value| {
            scalar_string(value)
                .ok_or_else(|| ValidationError::invalid_format(field, "expected string or number"))
        })
}

fn optional_string(data: &JsonValue, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| data.get(*key))
        .and_then(scalar_string)
        .filter(|s| !s.trim().is_empty())
}

fn incident_id(data: &JsonValue) -> Result<IncidentId, ValidationError> {
    IncidentId::new(required_string(data, &INCIDENT_ID_KEYS, "emergencyId")?)
}

fn status_change(data: &JsonValue) -> Result<StatusChange, ValidationError> {
    let status = data
        .get("status")
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::missing_field("status"))?;

    let reporter = optional_string(data, &["userMobile", "user_mobile"])
        .map(ContactId::new)
        .transpose()?;

    Ok(StatusChange::new(incident_id(data)?, status)
        .with_operator(
            optional_string(data, &["adminName", "admin_name"]),
            optional_string(data, &["notes"]),
        )
        .with_reporter(reporter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_user_reads_mobile() {
        let msg = ClientMessage::parse(r#"{"event":"join-user","data":{"mobile":"9000000001"}}"#)
            .unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinUser {
                contact: ContactId::new("9000000001").unwrap()
            }
        );
    }

    #[test]
    fn join_user_without_mobile_is_rejected() {
        let err = ClientMessage::parse(r#"{"event":"join-user","data":{}}"#).unwrap_err();
        assert_eq!(
            err,
            ClientMessageError::Invalid(ValidationError::missing_field("mobile"))
        );
    }

    #[test]
    fn join_user_with_blank_mobile_is_rejected() {
        let err = ClientMessage::parse(r#"{"event":"join-user","data":{"mobile":"  "}}"#);
        assert!(matches!(err, Err(ClientMessageError::Invalid(_))));
    }

    #[test]
    fn join_admin_accepts_missing_id() {
        let msg = ClientMessage::parse(r#"{"event":"join-admin"}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinAdmin { operator: None });

        let msg = ClientMessage::parse(r#"{"event":"join-admin","data":"desk-4"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinAdmin {
                operator: Some("desk-4".to_string())
            }
        );
    }

    #[test]
    fn join_emergency_accepts_bare_string() {
        let msg = ClientMessage::parse(r#"{"event":"join-emergency","data":"EMG1"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinEmergency {
                incident_id: IncidentId::new("EMG1").unwrap()
            }
        );
    }

    #[test]
    fn join_emergency_without_id_is_rejected() {
        assert!(ClientMessage::parse(r#"{"event":"join-emergency"}"#).is_err());
        assert!(ClientMessage::parse(r#"{"event":"join-emergency","data":""}"#).is_err());
    }

    #[test]
    fn trigger_siren_reads_snake_case_id_and_keeps_payload() {
        let msg = ClientMessage::parse(
            r#"{"event":"trigger-siren","data":{"emergency_id":"EMG2","severity":"critical"}}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::TriggerSiren {
                incident_id,
                payload,
            } => {
                assert_eq!(incident_id.as_str(), "EMG2");
                assert_eq!(payload["severity"], json!("critical"));
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn stop_siren_accepts_string_or_object() {
        let bare = ClientMessage::parse(r#"{"event":"stop-siren","data":"EMG3"}"#).unwrap();
        let object =
            ClientMessage::parse(r#"{"event":"stop-siren","data":{"emergencyId":"EMG3"}}"#)
                .unwrap();
        assert_eq!(bare, object);
    }

    #[test]
    fn status_update_builds_change_with_optional_reporter() {
        let msg = ClientMessage::parse(
            r#"{"event":"emergency-status-update","data":{"emergencyId":"EMG4","status":"dispatched","adminName":"Desk 1","userMobile":"9000000005"}}"#,
        )
        .unwrap();
        let ClientMessage::EmergencyStatusUpdate(change) = msg else {
            panic!("expected status update");
        };
        assert_eq!(change.status, "dispatched");
        assert_eq!(change.admin_name.as_deref(), Some("Desk 1"));
        assert_eq!(change.reporter, Some(ContactId::new("9000000005").unwrap()));

        let msg = ClientMessage::parse(
            r#"{"event":"emergency-status-update","data":{"emergencyId":"EMG4","status":"closed","userMobile":""}}"#,
        )
        .unwrap();
        let ClientMessage::EmergencyStatusUpdate(change) = msg else {
            panic!("expected status update");
        };
        assert!(change.reporter.is_none());
    }

    #[test]
    fn status_update_without_status_is_rejected() {
        let err = ClientMessage::parse(
            r#"{"event":"emergency-status-update","data":{"emergencyId":"EMG4"}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ClientMessageError::Invalid(ValidationError::missing_field("status"))
        );
    }

    #[test]
    fn unit_location_without_incident_is_rejected() {
        assert!(
            ClientMessage::parse(r#"{"event":"response-unit-location","data":{"lat":1}}"#).is_err()
        );
    }

    #[test]
    fn unknown_event_and_garbage_are_rejected() {
        assert_eq!(
            ClientMessage::parse(r#"{"event":"dance"}"#).unwrap_err(),
            ClientMessageError::UnknownEvent("dance".to_string())
        );
        assert!(matches!(
            ClientMessage::parse("not json"),
            Err(ClientMessageError::InvalidFrame(_))
        ));
    }

    #[test]
    fn session_messages_use_event_envelope() {
        let value = serde_json::to_value(ServerMessage::from(SessionMessage::pong())).unwrap();
        assert_eq!(value["event"], json!("pong"));
        assert!(value["data"]["timestamp"].is_string());

        let id = ConnectionId::new();
        let value =
            serde_json::to_value(ServerMessage::from(SessionMessage::connected(id))).unwrap();
        assert_eq!(value["event"], json!("connected"));
        assert_eq!(value["data"]["connectionId"], json!(id.to_string()));
    }

    #[test]
    fn relay_events_serialize_unwrapped() {
        let id = IncidentId::new("EMG5").unwrap();
        let value =
            serde_json::to_value(ServerMessage::from(OutboundEvent::siren_stopped(&id))).unwrap();
        assert_eq!(value, json!({"event": "siren-stopped", "data": {"emergencyId": "EMG5"}}));
    }
}
