//! GetIncidentHandler - Query handler for a single incident.

use std::sync::Arc;

use crate::domain::foundation::IncidentId;
use crate::ports::{IncidentRecord, IncidentStore};

use super::IncidentError;

pub struct GetIncidentHandler {
    store: Arc<dyn IncidentStore>,
}

impl GetIncidentHandler {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, id: IncidentId) -> Result<IncidentRecord, IncidentError> {
        self.store
            .find_by_id(&id)
            .await?
            .ok_or(IncidentError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIncidentStore;
    use crate::application::test_support::FailingIncidentStore;
    use crate::domain::foundation::ContactId;
    use crate::ports::NewIncident;

    #[tokio::test]
    async fn returns_stored_record() {
        let store = Arc::new(InMemoryIncidentStore::new());
        let record = store
            .create(NewIncident {
                reporter_name: None,
                reporter: ContactId::new("9000000004").unwrap(),
                incident_type: "crime".to_string(),
                description: String::new(),
                severity: "medium".to_string(),
                location: None,
                address: None,
            })
            .await
            .unwrap();

        let found = GetIncidentHandler::new(store).handle(record.id.clone()).await.unwrap();
        assert_eq!(found, record);
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let handler = GetIncidentHandler::new(Arc::new(InMemoryIncidentStore::new()));
        let err = handler.handle(IncidentId::new("EMG1").unwrap()).await.unwrap_err();
        assert!(matches!(err, IncidentError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_is_infrastructure() {
        let handler = GetIncidentHandler::new(Arc::new(FailingIncidentStore));
        let err = handler.handle(IncidentId::new("EMG1").unwrap()).await.unwrap_err();
        assert!(matches!(err, IncidentError::Infrastructure(_)));
    }
}
