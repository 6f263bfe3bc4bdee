//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay core and the outside world. Adapters implement these ports.
//!
//! - `RoomBroadcaster` - Delivery of outbound events to live connections
//! - `IncidentStore` - The incident system of record and its audit trail,
//!   used by the request layer

mod incident_store;
mod room_broadcaster;

pub use incident_store::{
    IncidentFilter, IncidentLog, IncidentRecord, IncidentStore, LogAction, NewIncident,
    StatusUpdate, SYSTEM_DEPARTMENT, UNASSIGNED_DEPARTMENT,
};
pub use room_broadcaster::RoomBroadcaster;
