//! HTTP DTOs for emergency endpoints.
//!
//! Field names follow what the reporting app and dispatch console send.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::application::{ReportIncidentCommand, UpdateIncidentStatusCommand};
use crate::domain::foundation::IncidentId;
use crate::ports::{IncidentLog, IncidentRecord};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to report a new emergency.
///
/// Required fields are optional here so that a missing field is reported
/// by validation rather than rejected by the extractor. `mobileNumber` may
/// arrive as a JSON string or number.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEmergencyRequest {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub location: Option<JsonValue>,
    #[serde(default)]
    pub emergency_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

impl From<ReportEmergencyRequest> for ReportIncidentCommand {
    fn from(req: ReportEmergencyRequest) -> Self {
        Self {
            reporter_name: req.user_name,
            mobile_number: req.mobile_number.unwrap_or_default(),
            incident_type: req.emergency_type.unwrap_or_default(),
            description: req.description,
            severity: req.severity,
            location: req.location,
            address: req.address,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|value| match value {
        Loose::Text(text) => text,
        Loose::Number(number) => number.to_string(),
    }))
}

/// Request to change an emergency's status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub admin_name: Option<String>,
}

impl UpdateStatusRequest {
    pub fn into_command(self, incident_id: IncidentId) -> UpdateIncidentStatusCommand {
        UpdateIncidentStatusCommand {
            incident_id,
            status: self.status.unwrap_or_default(),
            department: self.department.filter(|d| !d.trim().is_empty()),
            notes: self.notes,
            admin_name: self.admin_name,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a newly reported emergency.
#[derive(Debug, Clone, Serialize)]
pub struct EmergencyCreatedResponse {
    pub success: bool,
    pub message: String,
    pub emergency_id: IncidentId,
    pub data: IncidentRecord,
}

impl EmergencyCreatedResponse {
    pub fn new(record: IncidentRecord) -> Self {
        Self {
            success: true,
            message: "Emergency reported successfully".to_string(),
            emergency_id: record.id.clone(),
            data: record,
        }
    }
}

/// Response wrapping a single emergency record.
#[derive(Debug, Clone, Serialize)]
pub struct EmergencyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: IncidentRecord,
}

impl EmergencyResponse {
    pub fn found(record: IncidentRecord) -> Self {
        Self {
            success: true,
            message: None,
            data: record,
        }
    }

    pub fn updated(record: IncidentRecord) -> Self {
        Self {
            success: true,
            message: Some("Emergency status updated successfully".to_string()),
            data: record,
        }
    }
}

/// Response wrapping a listing, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

pub type EmergencyListResponse = ListResponse<IncidentRecord>;
pub type IncidentLogsResponse = ListResponse<IncidentLog>;

/// Error response body shared by all relay endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Error code for programmatic handling.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_request_reads_camel_case_fields() {
        let req: ReportEmergencyRequest = serde_json::from_value(json!({
            "userName": "Asha",
            "mobileNumber": "9000000001",
            "emergencyType": "fire",
            "location": {"lat": 1.0, "lng": 2.0}
        }))
        .unwrap();

        let cmd = ReportIncidentCommand::from(req);
        assert_eq!(cmd.mobile_number, "9000000001");
        assert_eq!(cmd.incident_type, "fire");
        assert_eq!(cmd.reporter_name.as_deref(), Some("Asha"));
        assert!(cmd.severity.is_none());
    }

    #[test]
    fn numeric_mobile_number_is_read_as_text() {
        let req: ReportEmergencyRequest = serde_json::from_value(json!({
            "mobileNumber": 9000000001u64,
            "emergencyType": "fire"
        }))
        .unwrap();
        assert_eq!(req.mobile_number.as_deref(), Some("9000000001"));
    }

    #[test]
    fn null_mobile_number_is_absent() {
        let req: ReportEmergencyRequest =
            serde_json::from_value(json!({"mobileNumber": null})).unwrap();
        assert!(req.mobile_number.is_none());
    }

    #[test]
    fn structured_mobile_number_is_rejected() {
        let result: Result<ReportEmergencyRequest, _> =
            serde_json::from_value(json!({"mobileNumber": {"cc": "+91"}}));
        assert!(result.is_err());
    }

    #[test]
    fn missing_required_fields_become_empty_strings() {
        let req: ReportEmergencyRequest = serde_json::from_value(json!({})).unwrap();
        let cmd = ReportIncidentCommand::from(req);
        assert!(cmd.mobile_number.is_empty());
        assert!(cmd.incident_type.is_empty());
    }

    #[test]
    fn blank_department_is_ignored() {
        let req: UpdateStatusRequest =
            serde_json::from_value(json!({"status": "resolved", "department": ""})).unwrap();
        let cmd = req.into_command(IncidentId::new("EMG1").unwrap());
        assert_eq!(cmd.status, "resolved");
        assert!(cmd.department.is_none());
    }

    #[test]
    fn error_response_is_unsuccessful() {
        let value = serde_json::to_value(ErrorResponse::new("EMPTY_FIELD", "nope")).unwrap();
        assert_eq!(value, json!({"success": false, "message": "nope", "code": "EMPTY_FIELD"}));
    }
}
