//! Domain events consumed by the router, and the deliveries it derives.

use serde_json::Value as JsonValue;

use crate::domain::foundation::{ConnectionId, IncidentId};
use crate::domain::incident::{IncidentEvent, ReporterLocation, StatusChange, UnitLocation};

use super::{OutboundEvent, Room};

/// Something happened that observers may need to hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    IncidentCreated(IncidentEvent),
    StatusChanged(StatusChange),
    ReporterLocation(ReporterLocation),
    UnitLocation(UnitLocation),
    /// An operator raised a siren by hand.
    SirenTriggered {
        incident_id: IncidentId,
        payload: JsonValue,
    },
    /// An operator silenced a siren.
    SirenStopRequested { incident_id: IncidentId },
}

impl RelayEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayEvent::IncidentCreated(_) => "incident_created",
            RelayEvent::StatusChanged(_) => "status_changed",
            RelayEvent::ReporterLocation(_) => "reporter_location",
            RelayEvent::UnitLocation(_) => "unit_location",
            RelayEvent::SirenTriggered { .. } => "siren_triggered",
            RelayEvent::SirenStopRequested { .. } => "siren_stop_requested",
        }
    }
}

/// One (room, payload) instruction produced by the router.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub room: Room,
    pub event: OutboundEvent,
    /// Connection that must not receive its own relayed signal back.
    pub except: Option<ConnectionId>,
}

impl Delivery {
    pub fn new(room: Room, event: OutboundEvent) -> Self {
        Self {
            room,
            event,
            except: None,
        }
    }

    pub fn except(mut self, origin: Option<ConnectionId>) -> Self {
        self.except = origin;
        self
    }
}
