//! # realm-gateway
//!
//! WebSocket gateway for real-time channel events.
//!
//! Clients identify with an access token, then subscribe to the channels
//! they want live messages and reaction changes for. Events arrive from the
//! API servers over Redis Pub/Sub and are fanned out through the channel hub.

pub mod broadcast;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod hub;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};
