//! WebSocket adapters for the live relay channel.
//!
//! # Architecture
//!
//! ```text
//!   socket ──frames──▶ ConnectionSession ──joins──▶ RoomDirectory
//!                             │                         ▲
//!                             │ relay events            │ resolve
//!                             ▼                         │
//!                        EventRouter ──deliveries──▶ ConnectionHub ──outbox──▶ socket
//!                             │                         ▲
//!                             └──▶ SirenRegistry ───────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire protocol types
//! - [`rooms`] - Bidirectional room membership index
//! - [`hub`] - Live connections and room delivery
//! - [`session`] - Per-connection signal handling
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod hub;
pub mod messages;
pub mod rooms;
pub mod session;

pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use hub::{ConnectionHub, Inbox, Outbox};
pub use messages::{
    ClientMessage, ClientMessageError, ConnectedMessage, PongMessage, ServerMessage,
    SessionMessage,
};
pub use rooms::{Membership, RoomDirectory};
pub use session::ConnectionSession;
