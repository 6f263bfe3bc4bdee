//! Incident module - transient incident payloads and the escalation classifier.

mod classifier;
mod event;
mod location;

pub use classifier::{
    classify, escalation, EscalationTrigger, CRITICAL_KEYWORDS, CRITICAL_SEVERITY,
    HIGH_ACUITY_TYPES,
};
pub use event::{IncidentEvent, StatusChange, INITIAL_STATUS};
pub use location::{ReporterLocation, UnitLocation};
