//! Active siren snapshot shared with operator consoles.

use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::domain::foundation::{IncidentId, Timestamp};

/// How long a siren sounds unless cancelled first.
pub const SIREN_DURATION: Duration = Duration::from_secs(30);

/// Why a siren was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SirenReason {
    /// The classifier escalated a newly created incident.
    CriticalEmergencyDetected,
    /// An operator raised it by hand.
    ManualTrigger,
}

/// One in-flight global alert, keyed by incident id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSiren {
    pub incident_id: IncidentId,

    /// The incident payload that triggered the siren.
    pub payload: JsonValue,

    #[serde(rename = "sirenReason")]
    pub reason: SirenReason,

    pub triggered_at: Timestamp,

    #[serde(rename = "sirenDuration", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ActiveSiren {
    pub fn new(
        incident_id: IncidentId,
        payload: JsonValue,
        reason: SirenReason,
        duration: Duration,
    ) -> Self {
        Self {
            incident_id,
            payload,
            reason,
            triggered_at: Timestamp::now(),
            duration,
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}
