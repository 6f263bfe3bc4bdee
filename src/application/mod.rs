//! Application layer - Relay services and request handlers.
//!
//! The siren registry and event router hold the relay's shared state and
//! fan-out rules. Handlers sit in front of them for the request layer,
//! persisting through the incident store before anything is relayed.

pub mod event_router;
pub mod handlers;
pub mod siren_registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use event_router::{EventRouter, RouteOutcome, RoutePlan, SirenAction};
pub use handlers::{
    GetIncidentHandler, GetIncidentLogsHandler, IncidentError, ListIncidentsHandler,
    ReportIncidentCommand, ReportIncidentHandler, ReportIncidentResult,
    UpdateIncidentStatusCommand, UpdateIncidentStatusHandler, UpdateIncidentStatusResult,
    DEFAULT_SEVERITY,
};
pub use siren_registry::{AlertHandle, SirenRegistry, DEFAULT_MAX_ACTIVE};
