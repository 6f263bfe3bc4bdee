//! UpdateIncidentStatusHandler - Command handler for operator status changes.

use std::sync::Arc;

use crate::application::event_router::{EventRouter, RouteOutcome};
use crate::domain::foundation::{IncidentId, ValidationError};
use crate::domain::incident::StatusChange;
use crate::domain::relay::RelayEvent;
use crate::ports::{IncidentLog, IncidentRecord, IncidentStore, StatusUpdate};

use super::IncidentError;

/// Command to change an incident's status.
#[derive(Debug, Clone)]
pub struct UpdateIncidentStatusCommand {
    pub incident_id: IncidentId,
    pub status: String,
    pub department: Option<String>,
    pub notes: Option<String>,
    pub admin_name: Option<String>,
}

/// Result of a successful status change.
#[derive(Debug, Clone)]
pub struct UpdateIncidentStatusResult {
    pub record: IncidentRecord,
    pub change: StatusChange,
    pub outcome: RouteOutcome,
}

/// Handler for status changes.
pub struct UpdateIncidentStatusHandler {
    store: Arc<dyn IncidentStore>,
    router: Arc<EventRouter>,
}

impl UpdateIncidentStatusHandler {
    pub fn new(store: Arc<dyn IncidentStore>, router: Arc<EventRouter>) -> Self {
        Self { store, router }
    }

    pub async fn handle(
        &self,
        cmd: UpdateIncidentStatusCommand,
    ) -> Result<UpdateIncidentStatusResult, IncidentError> {
        let status = cmd.status.trim().to_string();
        if status.is_empty() {
            return Err(ValidationError::empty_field("status").into());
        }

        let record = self
            .store
            .update_status(
                &cmd.incident_id,
                StatusUpdate {
                    status: status.clone(),
                    department: cmd.department.clone(),
                },
            )
            .await?
            .ok_or_else(|| IncidentError::NotFound(cmd.incident_id.clone()))?;

        tracing::info!(
            incident_id = %record.id,
            status = %record.status,
            department = %record.department,
            "Emergency status updated"
        );

        let entry = IncidentLog::status_updated(
            &record,
            cmd.department,
            cmd.admin_name.clone(),
            cmd.notes.clone(),
        );
        if let Err(e) = self.store.append_log(entry).await {
            tracing::warn!(incident_id = %record.id, error = %e, "Failed to write incident log");
        }

        let change = StatusChange::new(record.id.clone(), status)
            .with_operator(cmd.admin_name, cmd.notes)
            .with_reporter(Some(record.reporter.clone()));

        let outcome = self
            .router
            .route(RelayEvent::StatusChanged(change.clone()), None)
            .await;

        Ok(UpdateIncidentStatusResult {
            record,
            change,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIncidentStore;
    use crate::application::siren_registry::{SirenRegistry, DEFAULT_MAX_ACTIVE};
    use crate::application::test_support::RecordingBroadcaster;
    use crate::domain::foundation::ContactId;
    use crate::domain::relay::{OutboundEvent, Room};
    use crate::domain::siren::SIREN_DURATION;
    use crate::ports::{LogAction, NewIncident};

    async fn setup() -> (
        UpdateIncidentStatusHandler,
        Arc<RecordingBroadcaster>,
        IncidentId,
    ) {
        let (handler, broadcaster, id, _) = setup_with_store().await;
        (handler, broadcaster, id)
    }

    async fn setup_with_store() -> (
        UpdateIncidentStatusHandler,
        Arc<RecordingBroadcaster>,
        IncidentId,
        Arc<InMemoryIncidentStore>,
    ) {
        let store = Arc::new(InMemoryIncidentStore::new());
        let record = store
            .create(NewIncident {
                reporter_name: None,
                reporter: ContactId::new("9000000003").unwrap(),
                incident_type: "fire".to_string(),
                description: String::new(),
                severity: "low".to_string(),
                location: None,
                address: None,
            })
            .await
            .unwrap();

        let broadcaster = Arc::new(RecordingBroadcaster::new());
        let sirens = SirenRegistry::new(broadcaster.clone(), DEFAULT_MAX_ACTIVE);
        let router = Arc::new(EventRouter::new(broadcaster.clone(), sirens, SIREN_DURATION));
        (
            UpdateIncidentStatusHandler::new(store.clone(), router),
            broadcaster,
            record.id,
            store,
        )
    }

    fn command(id: IncidentId, status: &str) -> UpdateIncidentStatusCommand {
        UpdateIncidentStatusCommand {
            incident_id: id,
            status: status.to_string(),
            department: Some("fire".to_string()),
            notes: Some("crew en route".to_string()),
            admin_name: Some("Desk 4".to_string()),
        }
    }

    #[tokio::test]
    async fn status_change_reaches_operators_incident_room_and_reporter() {
        let (handler, broadcaster, id) = setup().await;

        let result = handler.handle(command(id.clone(), "dispatched")).await.unwrap();

        assert_eq!(result.record.department, "fire");
        assert_eq!(
            broadcaster.rooms_for("emergency-status-changed"),
            vec![Room::Operators, Room::incident(&id)]
        );
        let reporter_updates = broadcaster.named("user-emergency-update");
        assert_eq!(reporter_updates.len(), 1);
        match &reporter_updates[0].event {
            OutboundEvent::UserEmergencyUpdate(update) => {
                assert_eq!(update.message, "Your emergency status updated to: dispatched");
                assert_eq!(update.admin_name.as_deref(), Some("Desk 4"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn status_change_is_logged_with_operator_and_notes() {
        let (handler, _, id, store) = setup_with_store().await;

        handler.handle(command(id.clone(), "dispatched")).await.unwrap();

        let mut without_notes = command(id.clone(), "resolved");
        without_notes.notes = None;
        without_notes.department = None;
        handler.handle(without_notes).await.unwrap();

        let logs = store.logs(&id).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|entry| entry.action == LogAction::StatusUpdated));
        assert_eq!(logs[0].notes, "Status changed to: resolved");
        assert_eq!(logs[0].department, "system");
        assert_eq!(logs[1].notes, "crew en route");
        assert_eq!(logs[1].department, "fire");
        assert_eq!(logs[1].admin_name.as_deref(), Some("Desk 4"));
    }

    #[tokio::test]
    async fn unknown_incident_is_not_found_and_relays_nothing() {
        let (handler, broadcaster, _) = setup().await;

        let err = handler
            .handle(command(IncidentId::new("EMG404").unwrap(), "resolved"))
            .await
            .unwrap_err();

        assert!(matches!(err, IncidentError::NotFound(_)));
        assert!(broadcaster.deliveries().is_empty());
    }

    #[tokio::test]
    async fn blank_status_is_rejected() {
        let (handler, _, id) = setup().await;

        let err = handler.handle(command(id, " ")).await.unwrap_err();

        assert!(matches!(err, IncidentError::ValidationFailed(_)));
    }
}
