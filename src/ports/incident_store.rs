//! IncidentStore port - the external system of record for incidents.
//!
//! The relay core never reads or writes records itself. The request layer
//! persists through this port first and only then hands an already-validated
//! event to the router.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::domain::foundation::{ContactId, DomainError, IncidentId, Timestamp};
use crate::domain::incident::{IncidentEvent, INITIAL_STATUS};

/// Department assigned before an operator routes the incident.
pub const UNASSIGNED_DEPARTMENT: &str = "pending";

/// Input for creating an incident record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub reporter_name: Option<String>,
    pub reporter: ContactId,
    pub incident_type: String,
    pub description: String,
    pub severity: String,
    pub location: Option<JsonValue>,
    pub address: Option<String>,
}

/// Input for a status change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: String,
    pub department: Option<String>,
}

/// A persisted incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentRecord {
    #[serde(rename = "emergency_id")]
    pub id: IncidentId,
    #[serde(rename = "user_name", skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
    #[serde(rename = "mobile_number")]
    pub reporter: ContactId,
    #[serde(rename = "emergency_type")]
    pub incident_type: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IncidentRecord {
    /// Builds a fresh record in the initial status.
    pub fn from_new(id: IncidentId, incident: NewIncident) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            reporter_name: incident.reporter_name,
            reporter: incident.reporter,
            incident_type: incident.incident_type,
            description: incident.description,
            severity: incident.severity,
            status: INITIAL_STATUS.to_string(),
            department: UNASSIGNED_DEPARTMENT.to_string(),
            location: incident.location,
            address: incident.address,
            created_at: now,
            updated_at: now,
        }
    }

    /// The transient event broadcast when this record is created.
    pub fn to_event(&self) -> IncidentEvent {
        IncidentEvent {
            incident_id: self.id.clone(),
            reporter_name: self.reporter_name.clone(),
            reporter: Some(self.reporter.clone()),
            incident_type: self.incident_type.clone(),
            description: self.description.clone(),
            severity: self.severity.clone(),
            status: self.status.clone(),
            location: self.location.clone(),
            address: self.address.clone(),
            department: Some(self.department.clone()),
            created_at: self.created_at,
        }
    }
}

/// Which incidents a listing returns.
#[derive(Debug, Clone, PartialEq)]
pub enum IncidentFilter {
    All,
    Reporter(ContactId),
    Department(String),
}

impl IncidentFilter {
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        match self {
            IncidentFilter::All => true,
            IncidentFilter::Reporter(reporter) => &record.reporter == reporter,
            IncidentFilter::Department(department) => &record.department == department,
        }
    }
}

/// Department recorded on log entries written by the system itself.
pub const SYSTEM_DEPARTMENT: &str = "system";

/// What an audit log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    EmergencyCreated,
    StatusUpdated,
}

/// One entry in an incident's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentLog {
    #[serde(rename = "emergency_id")]
    pub incident_id: IncidentId,
    pub action: LogAction,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    pub notes: String,
    pub created_at: Timestamp,
}

impl IncidentLog {
    /// Entry written when a report is stored.
    pub fn created(record: &IncidentRecord) -> Self {
        Self {
            incident_id: record.id.clone(),
            action: LogAction::EmergencyCreated,
            department: SYSTEM_DEPARTMENT.to_string(),
            admin_name: None,
            notes: format!(
                "New emergency created: {} - {}",
                record.incident_type, record.description
            ),
            created_at: Timestamp::now(),
        }
    }

    /// Entry written when an operator changes the status.
    ///
    /// Without notes, the entry describes the new status.
    pub fn status_updated(
        record: &IncidentRecord,
        department: Option<String>,
        admin_name: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            incident_id: record.id.clone(),
            action: LogAction::StatusUpdated,
            department: department.unwrap_or_else(|| SYSTEM_DEPARTMENT.to_string()),
            admin_name,
            notes: notes.unwrap_or_else(|| format!("Status changed to: {}", record.status)),
            created_at: Timestamp::now(),
        }
    }
}

/// Port for the incident system of record.
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Persist a new incident and return it with its assigned id.
    async fn create(&self, incident: NewIncident) -> Result<IncidentRecord, DomainError>;

    /// Change an incident's status.
    ///
    /// Returns `Ok(None)` when no incident has this id.
    async fn update_status(
        &self,
        id: &IncidentId,
        update: StatusUpdate,
    ) -> Result<Option<IncidentRecord>, DomainError>;

    /// Look up an incident by id.
    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<IncidentRecord>, DomainError>;

    /// Incidents matching `filter`, newest first.
    async fn list(&self, filter: IncidentFilter) -> Result<Vec<IncidentRecord>, DomainError>;

    /// Append an entry to an incident's audit trail.
    async fn append_log(&self, entry: IncidentLog) -> Result<(), DomainError>;

    /// Audit trail for an incident, newest first.
    ///
    /// An unknown id has an empty trail.
    async fn logs(&self, id: &IncidentId) -> Result<Vec<IncidentLog>, DomainError>;
}
