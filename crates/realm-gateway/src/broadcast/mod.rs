//! Event broadcasting
//!
//! Handles distribution of events from Redis Pub/Sub to WebSocket connections.

mod dispatcher;
mod router;

pub use dispatcher::EventDispatcher;
pub use router::{spawn_refresh_debouncer, EventRouter};
