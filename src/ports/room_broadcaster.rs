//! RoomBroadcaster port - Interface for delivering events to live connections.
//!
//! The router decides *what* goes *where*; implementations of this port
//! resolve a room to its live connections and push the payload to each.
//! Delivery is best-effort: nothing is buffered for absent clients.

use async_trait::async_trait;

use crate::domain::foundation::ConnectionId;
use crate::domain::relay::{Delivery, OutboundEvent};

/// Port for fire-and-forget delivery to rooms and single connections.
///
/// Implementations must:
/// - Treat an empty or unknown room as a silent no-op
/// - Never block on a slow client
/// - Skip `delivery.except` when set
#[async_trait]
pub trait RoomBroadcaster: Send + Sync {
    /// Deliver to every live member of `delivery.room`.
    ///
    /// Returns how many connections the event was handed to.
    async fn broadcast(&self, delivery: Delivery) -> usize;

    /// Deliver to one connection only.
    ///
    /// Returns false when the connection is gone.
    async fn send_to(&self, connection: &ConnectionId, event: OutboundEvent) -> bool;
}
