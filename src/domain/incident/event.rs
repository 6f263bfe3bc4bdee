//! Transient incident payloads carried through the relay.
//!
//! These are not the system of record; the incident store owns that. Field
//! names on the wire match what dispatch consoles already consume.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{ContactId, IncidentId, Timestamp};

use super::classifier::{self, EscalationTrigger};

/// Status assigned to every freshly reported incident.
pub const INITIAL_STATUS: &str = "pending";

/// A newly created incident, as broadcast to operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentEvent {
    #[serde(rename = "emergency_id")]
    pub incident_id: IncidentId,

    #[serde(rename = "user_name", default, skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,

    #[serde(rename = "mobile_number", default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<ContactId>,

    #[serde(rename = "emergency_type", default)]
    pub incident_type: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub severity: String,

    #[serde(default)]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    pub created_at: Timestamp,
}

impl IncidentEvent {
    /// Minimal event with the given classification inputs; other fields empty.
    pub fn new(
        incident_id: IncidentId,
        incident_type: impl Into<String>,
        severity: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            incident_id,
            reporter_name: None,
            reporter: None,
            incident_type: incident_type.into(),
            description: description.into(),
            severity: severity.into(),
            status: INITIAL_STATUS.to_string(),
            location: None,
            address: None,
            department: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn with_reporter(mut self, reporter: ContactId) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Runs the classifier over this event.
    pub fn escalation(&self) -> Option<EscalationTrigger> {
        classifier::escalation(&self.severity, &self.incident_type, &self.description)
    }

    /// JSON form used for broadcasts and siren payloads.
    pub fn to_payload(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// An operator changed the status of an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    #[serde(rename = "emergencyId")]
    pub incident_id: IncidentId,

    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Reporter to notify personally; no reporter broadcast when absent.
    #[serde(rename = "userMobile", default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<ContactId>,

    pub timestamp: Timestamp,
}

impl StatusChange {
    pub fn new(incident_id: IncidentId, status: impl Into<String>) -> Self {
        Self {
            incident_id,
            status: status.into(),
            admin_name: None,
            notes: None,
            reporter: None,
            timestamp: Timestamp::now(),
        }
    }

    pub fn with_operator(mut self, admin_name: Option<String>, notes: Option<String>) -> Self {
        self.admin_name = admin_name;
        self.notes = notes;
        self
    }

    pub fn with_reporter(mut self, reporter: Option<ContactId>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Human-readable line shown to the reporter.
    pub fn reporter_message(&self) -> String {
        format!("Your emergency status updated to: {}", self.status)
    }
}
