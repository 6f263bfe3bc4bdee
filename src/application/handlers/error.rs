//! Errors returned by the incident request handlers.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, IncidentId, ValidationError};

/// Failure of an incident command or query.
#[derive(Debug, Clone, Error)]
pub enum IncidentError {
    #[error("Emergency not found: {0}")]
    NotFound(IncidentId),

    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),

    #[error(transparent)]
    Infrastructure(#[from] DomainError),
}

impl IncidentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            IncidentError::NotFound(_) => ErrorCode::IncidentNotFound,
            IncidentError::ValidationFailed(err) => DomainError::from(err.clone()).code,
            IncidentError::Infrastructure(err) => err.code,
        }
    }

    /// Message safe to show to a caller.
    pub fn message(&self) -> String {
        match self {
            IncidentError::Infrastructure(_) => "Failed to process emergency".to_string(),
            other => other.to_string(),
        }
    }
}
