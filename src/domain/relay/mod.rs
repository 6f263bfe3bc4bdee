//! Relay module - rooms, routed events, and outbound wire events.

mod event;
mod outbound;
mod room;

pub use event::{Delivery, RelayEvent};
pub use outbound::{OutboundEvent, ReporterUpdate, SirenStopped, REPORT_ACKNOWLEDGMENT};
pub use room::Room;
