//! Room membership directory.
//!
//! Rooms are names, not entities. A room exists while it has at least one
//! member and vanishes with its last member.
//!
//! ```text
//! Room: admin-room       Room: emergency-EMG1    Room: user-9000000001
//! ├── conn-a             ├── conn-a              └── conn-c
//! └── conn-b             └── conn-d
//! ```
//!
//! Both directions of the index are kept under one lock, so a reader never
//! sees a connection in a room that is missing from the connection's own set.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::domain::foundation::ConnectionId;
use crate::domain::relay::Room;

/// Bidirectional membership index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Membership {
    rooms: HashMap<Room, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, HashSet<Room>>,
}

impl Membership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the connection was not already a member.
    pub fn join(&mut self, connection: ConnectionId, room: Room) -> bool {
        let added = self.rooms.entry(room.clone()).or_default().insert(connection);
        self.connections.entry(connection).or_default().insert(room);
        added
    }

    /// Returns `true` if the connection was a member.
    pub fn leave(&mut self, connection: &ConnectionId, room: &Room) -> bool {
        let removed = match self.rooms.get_mut(room) {
            Some(members) => {
                let removed = members.remove(connection);
                if members.is_empty() {
                    self.rooms.remove(room);
                }
                removed
            }
            None => false,
        };

        if let Some(joined) = self.connections.get_mut(connection) {
            joined.remove(room);
            if joined.is_empty() {
                self.connections.remove(connection);
            }
        }

        removed
    }

    pub fn resolve(&self, room: &Room) -> HashSet<ConnectionId> {
        self.rooms.get(room).cloned().unwrap_or_default()
    }

    /// Drops the connection from every room it joined; returns those rooms.
    pub fn remove_connection(&mut self, connection: &ConnectionId) -> Vec<Room> {
        let Some(joined) = self.connections.remove(connection) else {
            return Vec::new();
        };

        for room in &joined {
            if let Some(members) = self.rooms.get_mut(room) {
                members.remove(connection);
                if members.is_empty() {
                    self.rooms.remove(room);
                }
            }
        }

        let mut rooms: Vec<Room> = joined.into_iter().collect();
        rooms.sort();
        rooms
    }

    pub fn rooms_of(&self, connection: &ConnectionId) -> Vec<Room> {
        let mut rooms: Vec<Room> = self
            .connections
            .get(connection)
            .map(|joined| joined.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    pub fn is_member(&self, connection: &ConnectionId, room: &Room) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains(connection))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        let forward = self.rooms.iter().all(|(room, members)| {
            !members.is_empty()
                && members.iter().all(|c| {
                    self.connections
                        .get(c)
                        .is_some_and(|joined| joined.contains(room))
                })
        });
        let inverse = self.connections.iter().all(|(c, joined)| {
            !joined.is_empty()
                && joined
                    .iter()
                    .all(|room| self.rooms.get(room).is_some_and(|m| m.contains(c)))
        });
        forward && inverse
    }
}

/// Shared membership directory for live connections.
///
/// Uses `RwLock` since resolves (one per delivery) vastly outnumber joins
/// and leaves.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    membership: RwLock<Membership>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub async fn join(&self, connection: ConnectionId, room: Room) -> bool {
        let added = self.membership.write().await.join(connection, room.clone());
        if added {
            tracing::debug!(connection_id = %connection, room = %room, "Joined room");
        }
        added
    }

    /// Idempotent.
    pub async fn leave(&self, connection: &ConnectionId, room: &Room) -> bool {
        let removed = self.membership.write().await.leave(connection, room);
        if removed {
            tracing::debug!(connection_id = %connection, room = %room, "Left room");
        }
        removed
    }

    /// Current members of a room; empty when nobody joined it.
    pub async fn resolve(&self, room: &Room) -> HashSet<ConnectionId> {
        self.membership.read().await.resolve(room)
    }

    pub async fn remove_connection(&self, connection: &ConnectionId) -> Vec<Room> {
        let rooms = self.membership.write().await.remove_connection(connection);
        tracing::debug!(
            connection_id = %connection,
            rooms = rooms.len(),
            "Connection removed from directory"
        );
        rooms
    }

    pub async fn rooms_of(&self, connection: &ConnectionId) -> Vec<Room> {
        self.membership.read().await.rooms_of(connection)
    }

    pub async fn is_member(&self, connection: &ConnectionId, room: &Room) -> bool {
        self.membership.read().await.is_member(connection, room)
    }

    pub async fn room_count(&self) -> usize {
        self.membership.read().await.room_count()
    }

    pub async fn connection_count(&self) -> usize {
        self.membership.read().await.connection_count()
    }
}
