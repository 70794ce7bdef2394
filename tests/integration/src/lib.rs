//! Integration test utilities for NeonRealm
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API and WebSocket gateway.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
