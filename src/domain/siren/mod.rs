//! Siren module - the time-bounded global alert shared by operator consoles.

mod alert;
mod state;

pub use alert::{ActiveSiren, SirenReason, SIREN_DURATION};
pub use state::SirenState;
