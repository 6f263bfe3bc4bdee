//! In-process adapters.

mod incident_store;

pub use incident_store::InMemoryIncidentStore;
