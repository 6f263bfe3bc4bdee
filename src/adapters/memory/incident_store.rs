//! In-memory incident store.
//!
//! Keeps records and their audit trail for the lifetime of the process.
//! Ids follow the `EMG<unix-millis>` shape consoles already display; two
//! reports in the same millisecond get consecutive numbers. Listings come
//! back in reverse insertion order, which is newest first.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, IncidentId, Timestamp};
use crate::ports::{
    IncidentFilter, IncidentLog, IncidentRecord, IncidentStore, NewIncident, StatusUpdate,
};

const ID_PREFIX: &str = "EMG";

#[derive(Default)]
struct StoreState {
    records: HashMap<IncidentId, IncidentRecord>,
    created_order: Vec<IncidentId>,
    logs: Vec<IncidentLog>,
    last_issued: i64,
}

impl StoreState {
    fn next_id(&mut self, now_millis: i64) -> Result<IncidentId, DomainError> {
        let millis = now_millis.max(self.last_issued + 1);
        self.last_issued = millis;
        Ok(IncidentId::new(format!("{}{}", ID_PREFIX, millis))?)
    }
}

/// Incident store backed by a map behind an async lock.
#[derive(Default)]
pub struct InMemoryIncidentStore {
    state: RwLock<StoreState>,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    async fn create(&self, incident: NewIncident) -> Result<IncidentRecord, DomainError> {
        let mut state = self.state.write().await;
        let id = state.next_id(Timestamp::now().as_unix_millis())?;
        let record = IncidentRecord::from_new(id.clone(), incident);
        state.created_order.push(id.clone());
        state.records.insert(id, record.clone());

        tracing::debug!(incident_id = %record.id, "Incident stored");
        Ok(record)
    }

    async fn update_status(
        &self,
        id: &IncidentId,
        update: StatusUpdate,
    ) -> Result<Option<IncidentRecord>, DomainError> {
        let mut state = self.state.write().await;
        let Some(record) = state.records.get_mut(id) else {
            return Ok(None);
        };

        record.status = update.status;
        if let Some(department) = update.department {
            record.department = department;
        }
        record.updated_at = Timestamp::now();

        Ok(Some(record.clone()))
    }

    async fn find_by_id(&self, id: &IncidentId) -> Result<Option<IncidentRecord>, DomainError> {
        Ok(self.state.read().await.records.get(id).cloned())
    }

    async fn list(&self, filter: IncidentFilter) -> Result<Vec<IncidentRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .created_order
            .iter()
            .rev()
            .filter_map(|id| state.records.get(id))
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn append_log(&self, entry: IncidentLog) -> Result<(), DomainError> {
        tracing::debug!(incident_id = %entry.incident_id, action = ?entry.action, "Incident log appended");
        self.state.write().await.logs.push(entry);
        Ok(())
    }

    async fn logs(&self, id: &IncidentId) -> Result<Vec<IncidentLog>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .logs
            .iter()
            .rev()
            .filter(|entry| &entry.incident_id == id)
            .cloned()
            .collect())
    }
}
