//! Route configuration for emergency endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    get_emergency, get_emergency_logs, list_department_emergencies, list_emergencies,
    list_user_emergencies, report_emergency, update_emergency_status, EmergencyAppState,
};

/// Routes:
/// - `POST /api/emergency` - Report a new emergency
/// - `GET /api/emergency/:id` - Fetch one emergency
/// - `PUT /api/emergency/:id/status` - Change an emergency's status
/// - `GET /api/emergency/:id/logs` - Audit trail for one emergency
/// - `GET /api/emergencies` - Every emergency
/// - `GET /api/emergencies/department/:department` - Emergencies routed to a department
/// - `GET /api/user/emergencies/:mobile` - Emergencies reported from one number
pub fn emergency_router() -> Router<EmergencyAppState> {
    Router::new()
        .route("/api/emergency", post(report_emergency))
        .route("/api/emergency/:id", get(get_emergency))
        .route("/api/emergency/:id/status", put(update_emergency_status))
        .route("/api/emergency/:id/logs", get(get_emergency_logs))
        .route("/api/emergencies", get(list_emergencies))
        .route(
            "/api/emergencies/department/:department",
            get(list_department_emergencies),
        )
        .route("/api/user/emergencies/:mobile", get(list_user_emergencies))
}
