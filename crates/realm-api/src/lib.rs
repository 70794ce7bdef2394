//! # realm-api
//!
//! REST API server built with Axum framework.
//!
//! Channels, memberships, messages and reactions are served under `/api`;
//! liveness and readiness probes sit outside the rate limiter.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{bootstrap, create_app, create_app_state, run};
pub use state::AppState;
