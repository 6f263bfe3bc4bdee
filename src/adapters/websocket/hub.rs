//! Live connection registry and room delivery.
//!
//! Each registered connection owns an unbounded outbox drained by its socket
//! writer. Delivery resolves a room through the directory and pushes the
//! serialized event into every member's outbox; a member whose socket is
//! already gone is skipped.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::ConnectionId;
use crate::domain::relay::{Delivery, OutboundEvent, Room};
use crate::ports::RoomBroadcaster;

use super::messages::ServerMessage;
use super::rooms::RoomDirectory;

pub type Outbox = mpsc::UnboundedSender<ServerMessage>;
pub type Inbox = mpsc::UnboundedReceiver<ServerMessage>;

/// Registry of live connections plus their room memberships.
///
/// Lock order is always connections, then directory.
#[derive(Default)]
pub struct ConnectionHub {
    connections: RwLock<HashMap<ConnectionId, Outbox>>,
    directory: RoomDirectory,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    /// Register a new connection and hand back its outbox receiver.
    pub async fn register(&self) -> (ConnectionId, Inbox) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(id, tx);
        tracing::debug!(connection_id = %id, "Connection registered");
        (id, rx)
    }

    /// Forget a connection and drop it from every room.
    ///
    /// Once this returns, joins for `id` are refused.
    pub async fn unregister(&self, id: &ConnectionId) -> Vec<Room> {
        let mut connections = self.connections.write().await;
        connections.remove(id);
        let rooms = self.directory.remove_connection(id).await;
        drop(connections);

        tracing::debug!(connection_id = %id, rooms = rooms.len(), "Connection unregistered");
        rooms
    }

    /// Join a room; refused for connections that are not registered.
    pub async fn join(&self, id: ConnectionId, room: Room) -> bool {
        let connections = self.connections.read().await;
        if !connections.contains_key(&id) {
            tracing::debug!(connection_id = %id, room = %room, "Join refused for closed connection");
            return false;
        }
        self.directory.join(id, room).await
    }

    pub async fn leave(&self, id: &ConnectionId, room: &Room) -> bool {
        self.directory.leave(id, room).await
    }

    /// Push a message to one connection.
    pub async fn send(&self, id: &ConnectionId, message: ServerMessage) -> bool {
        match self.connections.read().await.get(id) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    pub async fn is_connected(&self, id: &ConnectionId) -> bool {
        self.connections.read().await.contains_key(id)
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[async_trait]
impl RoomBroadcaster for ConnectionHub {
    async fn broadcast(&self, delivery: Delivery) -> usize {
        let members = self.directory.resolve(&delivery.room).await;
        if members.is_empty() {
            return 0;
        }

        let message = ServerMessage::Relay(delivery.event);
        let connections = self.connections.read().await;
        let delivered = members
            .iter()
            .filter(|id| Some(**id) != delivery.except)
            .filter_map(|id| connections.get(id))
            .filter(|tx| tx.send(message.clone()).is_ok())
            .count();

        tracing::debug!(
            room = %delivery.room,
            event = message_name(&message),
            delivered,
            "Room delivery"
        );
        delivered
    }

    async fn send_to(&self, connection: &ConnectionId, event: OutboundEvent) -> bool {
        self.send(connection, ServerMessage::Relay(event)).await
    }
}

fn message_name(message: &ServerMessage) -> &'static str {
    match message {
        ServerMessage::Relay(event) => event.name(),
        ServerMessage::Session(_) => "session",
    }
}
