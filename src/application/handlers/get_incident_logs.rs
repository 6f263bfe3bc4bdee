//! GetIncidentLogsHandler - Query handler for an incident's audit trail.

use std::sync::Arc;

use crate::domain::foundation::IncidentId;
use crate::ports::{IncidentLog, IncidentStore};

use super::IncidentError;

pub struct GetIncidentLogsHandler {
    store: Arc<dyn IncidentStore>,
}

impl GetIncidentLogsHandler {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }

    /// Newest entry first. An unknown id yields an empty trail.
    pub async fn handle(&self, id: IncidentId) -> Result<Vec<IncidentLog>, IncidentError> {
        Ok(self.store.logs(&id).await?)
    }
}
