//! Named broadcast groups.

use std::fmt;

use crate::domain::foundation::{ContactId, IncidentId};

/// A logical broadcast group.
///
/// Rooms are not stored anywhere on their own; they exist only as keys in
/// the membership directory. A room nobody has joined simply receives nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Room {
    /// Personal room of one reporting user, keyed by contact id.
    Reporter(ContactId),
    /// The single room shared by every dispatch console.
    Operators,
    /// Trackers following one incident.
    Incident(IncidentId),
}

impl Room {
    pub fn reporter(contact: &ContactId) -> Self {
        Room::Reporter(contact.clone())
    }

    pub fn incident(id: &IncidentId) -> Self {
        Room::Incident(id.clone())
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::Reporter(contact) => write!(f, "user-{}", contact),
            Room::Operators => write!(f, "admin-room"),
            Room::Incident(id) => write!(f, "emergency-{}", id),
        }
    }
}
