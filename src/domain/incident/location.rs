//! Location updates relayed to operators and incident trackers.

use serde_json::Value as JsonValue;

use crate::domain::foundation::{IncidentId, ValidationError};

/// Position report from a reporting user. Opaque to the relay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterLocation {
    pub payload: JsonValue,
}

impl ReporterLocation {
    pub fn new(payload: JsonValue) -> Self {
        Self { payload }
    }
}

/// Position report from a response unit assigned to an incident.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitLocation {
    pub incident_id: IncidentId,
    /// The full report as sent, including coordinates.
    pub payload: JsonValue,
}

impl UnitLocation {
    /// Builds a unit location from a raw report, reading the incident id
    /// from `emergencyId` or `emergency_id`.
    pub fn from_payload(payload: JsonValue) -> Result<Self, ValidationError> {
        let raw_id = payload
            .get("emergencyId")
            .or_else(|| payload.get("emergency_id"))
            .ok_or_else(|| ValidationError::missing_field("emergencyId"))?;

        let incident_id = match raw_id {
            JsonValue::String(s) => IncidentId::new(s.as_str())?,
            JsonValue::Number(n) => IncidentId::new(n.to_string())?,
            _ => {
                return Err(ValidationError::invalid_format(
                    "emergencyId",
                    "expected string or number",
                ))
            }
        };

        Ok(Self { incident_id, payload })
    }
}
