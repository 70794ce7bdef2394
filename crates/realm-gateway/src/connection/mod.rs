//! Connection management
//!
//! Tracks WebSocket connections, their identity and their channel subscriptions.

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState};
pub use manager::ConnectionManager;
