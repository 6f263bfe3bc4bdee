//! ReportIncidentHandler - Command handler for newly reported emergencies.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::application::event_router::{EventRouter, RouteOutcome};
use crate::domain::foundation::{ContactId, ValidationError};
use crate::domain::relay::RelayEvent;
use crate::ports::{IncidentLog, IncidentRecord, IncidentStore, NewIncident};

use super::IncidentError;

/// Severity recorded when the reporter does not give one.
pub const DEFAULT_SEVERITY: &str = "medium";

/// Command to report a new emergency.
#[derive(Debug, Clone, Default)]
pub struct ReportIncidentCommand {
    pub reporter_name: Option<String>,
    pub mobile_number: String,
    pub incident_type: String,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub location: Option<JsonValue>,
    pub address: Option<String>,
}

/// Result of a successful report.
#[derive(Debug, Clone)]
pub struct ReportIncidentResult {
    pub record: IncidentRecord,
    pub outcome: RouteOutcome,
}

/// Handler for reporting emergencies.
pub struct ReportIncidentHandler {
    store: Arc<dyn IncidentStore>,
    router: Arc<EventRouter>,
}

impl ReportIncidentHandler {
    pub fn new(store: Arc<dyn IncidentStore>, router: Arc<EventRouter>) -> Self {
        Self { store, router }
    }

    pub async fn handle(
        &self,
        cmd: ReportIncidentCommand,
    ) -> Result<ReportIncidentResult, IncidentError> {
        // 1. Validate
        let reporter = ContactId::new(cmd.mobile_number)
            .map_err(|_| ValidationError::empty_field("mobileNumber"))?;
        let incident_type = cmd.incident_type.trim();
        if incident_type.is_empty() {
            return Err(ValidationError::empty_field("emergencyType").into());
        }
        let severity = cmd
            .severity
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEVERITY.to_string());

        // 2. Persist
        let record = self
            .store
            .create(NewIncident {
                reporter_name: cmd.reporter_name,
                reporter,
                incident_type: incident_type.to_string(),
                description: cmd.description.unwrap_or_default(),
                severity,
                location: cmd.location,
                address: cmd.address,
            })
            .await?;

        tracing::info!(
            incident_id = %record.id,
            incident_type = %record.incident_type,
            severity = %record.severity,
            "Emergency reported"
        );

        // The audit trail is secondary to relaying the report.
        if let Err(e) = self.store.append_log(IncidentLog::created(&record)).await {
            tracing::warn!(incident_id = %record.id, error = %e, "Failed to write incident log");
        }

        // 3. Relay
        let outcome = self
            .router
            .route(RelayEvent::IncidentCreated(record.to_event()), None)
            .await;

        Ok(ReportIncidentResult { record, outcome })
    }
}
