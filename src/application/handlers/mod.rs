//! Application handlers.
//!
//! Command and query handlers used by the request layer. Commands persist
//! through the incident store first, then hand the router an event.

mod error;
mod get_incident;
mod get_incident_logs;
mod list_incidents;
mod report_incident;
mod update_incident_status;

pub use error::IncidentError;
pub use get_incident::GetIncidentHandler;
pub use get_incident_logs::GetIncidentLogsHandler;
pub use list_incidents::ListIncidentsHandler;
pub use report_incident::{
    ReportIncidentCommand, ReportIncidentHandler, ReportIncidentResult, DEFAULT_SEVERITY,
};
pub use update_incident_status::{
    UpdateIncidentStatusCommand, UpdateIncidentStatusHandler, UpdateIncidentStatusResult,
};
