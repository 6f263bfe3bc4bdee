//! Events pushed to connected clients.
//!
//! Every variant serializes as `{"event": "<kebab-name>", "data": ...}`.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::domain::foundation::{IncidentId, Timestamp};
use crate::domain::incident::{IncidentEvent, StatusChange};
use crate::domain::siren::ActiveSiren;

/// Message shown to a reporter right after their incident is recorded.
pub const REPORT_ACKNOWLEDGMENT: &str = "Emergency reported successfully! Help is on the way.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundEvent {
    NewIncident(IncidentEvent),
    UserLocationUpdate(JsonValue),
    ResponseUnitLocation(JsonValue),
    UnitLocationUpdate(JsonValue),
    EmergencyStatusChanged(StatusChange),
    UserEmergencyUpdate(ReporterUpdate),
    EmergencySiren(ActiveSiren),
    SirenStopped(SirenStopped),
    ActiveSirens(Vec<ActiveSiren>),
}

impl OutboundEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::NewIncident(_) => "new-incident",
            OutboundEvent::UserLocationUpdate(_) => "user-location-update",
            OutboundEvent::ResponseUnitLocation(_) => "response-unit-location",
            OutboundEvent::UnitLocationUpdate(_) => "unit-location-update",
            OutboundEvent::EmergencyStatusChanged(_) => "emergency-status-changed",
            OutboundEvent::UserEmergencyUpdate(_) => "user-emergency-update",
            OutboundEvent::EmergencySiren(_) => "emergency-siren",
            OutboundEvent::SirenStopped(_) => "siren-stopped",
            OutboundEvent::ActiveSirens(_) => "active-sirens",
        }
    }

    pub fn siren_stopped(incident_id: &IncidentId) -> Self {
        OutboundEvent::SirenStopped(SirenStopped {
            emergency_id: incident_id.clone(),
        })
    }
}

/// Personal update delivered to a reporter's room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterUpdate {
    pub emergency_id: IncidentId,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: Timestamp,
}

impl ReporterUpdate {
    /// Acknowledgment for a freshly created incident.
    pub fn acknowledgment(incident: &IncidentEvent) -> Self {
        Self {
            emergency_id: incident.incident_id.clone(),
            status: incident.status.clone(),
            message: REPORT_ACKNOWLEDGMENT.to_string(),
            admin_name: None,
            notes: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Notification that an operator changed the incident status.
    pub fn status_changed(change: &StatusChange) -> Self {
        Self {
            emergency_id: change.incident_id.clone(),
            status: change.status.clone(),
            message: change.reporter_message(),
            admin_name: change.admin_name.clone(),
            notes: change.notes.clone(),
            timestamp: change.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SirenStopped {
    pub emergency_id: IncidentId,
}
