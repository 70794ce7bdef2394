//! Route definitions
//!
//! All API routes organized by domain and mounted under /api.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{channels, health, members, messages, reactions};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(channel_routes())
        .merge(message_routes())
}

/// Channel and membership routes
fn channel_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/channels",
            get(channels::list_channels).post(channels::create_channel),
        )
        .route(
            "/channels/:channel_id",
            get(channels::get_channel)
                .put(channels::update_channel)
                .delete(channels::delete_channel),
        )
        .route("/channels/:channel_id/members", get(members::list_members))
        .route("/channels/:channel_id/join", post(members::join_channel))
        .route("/channels/:channel_id/leave", delete(members::leave_channel))
        .route(
            "/channels/:channel_id/members/:user_id",
            put(members::update_member_role).delete(members::remove_member),
        )
}

/// Message and reaction routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route("/messages/thread", get(messages::get_thread))
        .route(
            "/messages/:message_id/reactions",
            post(reactions::toggle_reaction),
        )
}
