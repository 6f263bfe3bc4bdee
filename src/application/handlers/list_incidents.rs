//! ListIncidentsHandler - Query handler for incident listings.

use std::sync::Arc;

use crate::ports::{IncidentFilter, IncidentRecord, IncidentStore};

use super::IncidentError;

pub struct ListIncidentsHandler {
    store: Arc<dyn IncidentStore>,
}

impl ListIncidentsHandler {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }

    /// Incidents matching `filter`, newest first.
    pub async fn handle(
        &self,
        filter: IncidentFilter,
    ) -> Result<Vec<IncidentRecord>, IncidentError> {
        Ok(self.store.list(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryIncidentStore;
    use crate::application::test_support::FailingIncidentStore;
    use crate::domain::foundation::ContactId;
    use crate::ports::NewIncident;

    async fn store_with(mobiles: &[&str]) -> Arc<InMemoryIncidentStore> {
        let store = Arc::new(InMemoryIncidentStore::new());
        for mobile in mobiles {
            store
                .create(NewIncident {
                    reporter_name: None,
                    reporter: ContactId::new(*mobile).unwrap(),
                    incident_type: "medical".to_string(),
                    description: String::new(),
                    severity: "medium".to_string(),
                    location: None,
                    address: None,
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn lists_only_the_reporters_incidents() {
        let store = store_with(&["9000000001", "9000000002", "9000000001"]).await;
        let handler = ListIncidentsHandler::new(store);

        let mine = handler
            .handle(IncidentFilter::Reporter(ContactId::new("9000000001").unwrap()))
            .await
            .unwrap();

        assert_eq!(mine.len(), 2);
        assert!(mine[0].created_at >= mine[1].created_at);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let handler = ListIncidentsHandler::new(Arc::new(InMemoryIncidentStore::new()));
        assert!(handler.handle(IncidentFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_infrastructure() {
        let handler = ListIncidentsHandler::new(Arc::new(FailingIncidentStore));
        let err = handler.handle(IncidentFilter::All).await.unwrap_err();
        assert!(matches!(err, IncidentError::Infrastructure(_)));
    }
}
