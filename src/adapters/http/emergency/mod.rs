//! Emergency HTTP endpoints: reporting, lookups, listings, status changes,
//! and the per-incident audit trail.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    EmergencyCreatedResponse, EmergencyListResponse, EmergencyResponse, ErrorResponse,
    IncidentLogsResponse, ListResponse, ReportEmergencyRequest, UpdateStatusRequest,
};
pub use handlers::{EmergencyApiError, EmergencyAppState, JsonBody};
pub use routes::emergency_router;
