//! HTTP adapters - REST API implementations.
//!
//! The request layer in front of the relay. Writes go through the incident
//! store before anything is broadcast.

pub mod emergency;
pub mod status;

pub use emergency::{emergency_router, EmergencyAppState};
pub use status::{status_router, StatusAppState};
