//! Emergency Relay - real-time incident fan-out for dispatch consoles.
//!
//! Routes incident events to reporter, operator, and per-incident rooms
//! over WebSocket, and keeps a time-bounded siren shared by every operator
//! console for incidents classified as critical.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;
