//! HTTP handlers for emergency endpoints.
//!
//! These handlers connect Axum routes to the incident command and query
//! handlers. Every write persists first and relays second. Request bodies
//! go through [`JsonBody`] so malformed JSON gets the same error envelope
//! as a validation failure.

use std::sync::Arc;

use axum::extract::{FromRequest, Json, Path, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;

use crate::application::{
    EventRouter, GetIncidentHandler, GetIncidentLogsHandler, IncidentError,
    ListIncidentsHandler, ReportIncidentHandler, UpdateIncidentStatusHandler,
};
use crate::domain::foundation::{ContactId, IncidentId, ValidationError};
use crate::ports::{IncidentFilter, IncidentStore};

use super::dto::{
    EmergencyCreatedResponse, EmergencyListResponse, EmergencyResponse, ErrorResponse,
    IncidentLogsResponse, ReportEmergencyRequest, UpdateStatusRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct EmergencyAppState {
    pub store: Arc<dyn IncidentStore>,
    pub router: Arc<EventRouter>,
}

impl EmergencyAppState {
    pub fn new(store: Arc<dyn IncidentStore>, router: Arc<EventRouter>) -> Self {
        Self { store, router }
    }

    pub fn report_incident_handler(&self) -> ReportIncidentHandler {
        ReportIncidentHandler::new(self.store.clone(), self.router.clone())
    }

    pub fn update_status_handler(&self) -> UpdateIncidentStatusHandler {
        UpdateIncidentStatusHandler::new(self.store.clone(), self.router.clone())
    }

    pub fn get_incident_handler(&self) -> GetIncidentHandler {
        GetIncidentHandler::new(self.store.clone())
    }

    pub fn list_incidents_handler(&self) -> ListIncidentsHandler {
        ListIncidentsHandler::new(self.store.clone())
    }

    pub fn incident_logs_handler(&self) -> GetIncidentLogsHandler {
        GetIncidentLogsHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Extractors
// ════════════════════════════════════════════════════════════════════════════════

/// JSON request body whose rejections render as [`ErrorResponse`].
///
/// Any body Axum's `Json` would refuse (bad syntax, wrong field types,
/// missing content type) becomes a 400 with code `INVALID_FORMAT`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = EmergencyApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "Request body rejected");
                Err(ValidationError::invalid_format("body", rejection.body_text()).into())
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/emergency
pub async fn report_emergency(
    State(state): State<EmergencyAppState>,
    JsonBody(request): JsonBody<ReportEmergencyRequest>,
) -> Result<impl IntoResponse, EmergencyApiError> {
    let result = state
        .report_incident_handler()
        .handle(request.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EmergencyCreatedResponse::new(result.record)),
    ))
}

/// PUT /api/emergency/:id/status
pub async fn update_emergency_status(
    State(state): State<EmergencyAppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> Result<impl IntoResponse, EmergencyApiError> {
    let incident_id = IncidentId::new(id)?;
    let result = state
        .update_status_handler()
        .handle(request.into_command(incident_id))
        .await?;

    Ok(Json(EmergencyResponse::updated(result.record)))
}

/// GET /api/emergency/:id
pub async fn get_emergency(
    State(state): State<EmergencyAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, EmergencyApiError> {
    let incident_id = IncidentId::new(id)?;
    let record = state.get_incident_handler().handle(incident_id).await?;

    Ok(Json(EmergencyResponse::found(record)))
}

/// GET /api/emergency/:id/logs
pub async fn get_emergency_logs(
    State(state): State<EmergencyAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, EmergencyApiError> {
    let incident_id = IncidentId::new(id)?;
    let logs = state.incident_logs_handler().handle(incident_id).await?;

    Ok(Json(IncidentLogsResponse::new(logs)))
}

/// GET /api/emergencies
pub async fn list_emergencies(
    State(state): State<EmergencyAppState>,
) -> Result<impl IntoResponse, EmergencyApiError> {
    list(&state, IncidentFilter::All).await
}

/// GET /api/user/emergencies/:mobile
pub async fn list_user_emergencies(
    State(state): State<EmergencyAppState>,
    Path(mobile): Path<String>,
) -> Result<impl IntoResponse, EmergencyApiError> {
    let reporter = ContactId::new(mobile)?;
    list(&state, IncidentFilter::Reporter(reporter)).await
}

/// GET /api/emergencies/department/:department
pub async fn list_department_emergencies(
    State(state): State<EmergencyAppState>,
    Path(department): Path<String>,
) -> Result<impl IntoResponse, EmergencyApiError> {
    list(&state, IncidentFilter::Department(department)).await
}

async fn list(
    state: &EmergencyAppState,
    filter: IncidentFilter,
) -> Result<Json<EmergencyListResponse>, EmergencyApiError> {
    let records = state.list_incidents_handler().handle(filter).await?;
    Ok(Json(EmergencyListResponse::new(records)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for HTTP responses.
#[derive(Debug)]
pub struct EmergencyApiError(pub IncidentError);

impl From<IncidentError> for EmergencyApiError {
    fn from(err: IncidentError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for EmergencyApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for EmergencyApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            IncidentError::NotFound(_) => StatusCode::NOT_FOUND,
            IncidentError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            IncidentError::Infrastructure(err) => {
                tracing::error!(error = %err, "Emergency request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}
