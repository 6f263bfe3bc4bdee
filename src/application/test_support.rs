//! Test doubles shared by application-layer tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{ConnectionId, DomainError, ErrorCode, IncidentId};
use crate::domain::relay::{Delivery, OutboundEvent, Room};
use crate::ports::{
    IncidentFilter, IncidentLog, IncidentRecord, IncidentStore, NewIncident, RoomBroadcaster,
    StatusUpdate,
};

/// Broadcaster that records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingBroadcaster {
    deliveries: Mutex<Vec<Delivery>>,
    direct: Mutex<Vec<(ConnectionId, OutboundEvent)>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Deliveries whose event has the given wire name.
    pub fn named(&self, name: &str) -> Vec<Delivery> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.event.name() == name)
            .collect()
    }

    /// Rooms that received an event with the given wire name, in order.
    pub fn rooms_for(&self, name: &str) -> Vec<Room> {
        self.named(name).into_iter().map(|d| d.room).collect()
    }

    pub fn direct(&self) -> Vec<(ConnectionId, OutboundEvent)> {
        self.direct.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
        self.direct.lock().unwrap().clear();
    }
}

#[async_trait]
impl RoomBroadcaster for RecordingBroadcaster {
    async fn broadcast(&self, delivery: Delivery) -> usize {
        self.deliveries.lock().unwrap().push(delivery);
        1
    }

    async fn send_to(&self, connection: &ConnectionId, event: OutboundEvent) -> bool {
        self.direct.lock().unwrap().push((*connection, event));
        true
    }
}

/// Incident store whose every call fails.
pub struct FailingIncidentStore;

fn unavailable() -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, "store unavailable")
}

#[async_trait]
impl IncidentStore for FailingIncidentStore {
    async fn create(&self, _: NewIncident) -> Result<IncidentRecord, DomainError> {
        Err(unavailable())
    }

    async fn update_status(
        &self,
        _: &IncidentId,
        _: StatusUpdate,
    ) -> Result<Option<IncidentRecord>, DomainError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _: &IncidentId) -> Result<Option<IncidentRecord>, DomainError> {
        Err(unavailable())
    }

    async fn list(&self, _: IncidentFilter) -> Result<Vec<IncidentRecord>, DomainError> {
        Err(unavailable())
    }

    async fn append_log(&self, _: IncidentLog) -> Result<(), DomainError> {
        Err(unavailable())
    }

    async fn logs(&self, _: &IncidentId) -> Result<Vec<IncidentLog>, DomainError> {
        Err(unavailable())
    }
}
