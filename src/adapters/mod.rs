//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the relay to the outside world:
//! - `websocket` - Live connections, room directory, room delivery
//! - `http` - Request layer for reporting and updating incidents
//! - `memory` - In-process incident store

pub mod http;
pub mod memory;
pub mod websocket;

pub use memory::InMemoryIncidentStore;
pub use websocket::{ConnectionHub, RoomDirectory};
