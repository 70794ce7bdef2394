//! Gateway process wiring
//!
//! `/gateway` upgrades to the WebSocket protocol; `/health` answers plain text
//! for load balancers.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::broadcast::{spawn_refresh_debouncer, EventDispatcher, EventRouter};
use crate::connection::ConnectionManager;
use crate::hub::ChannelHub;
use axum::{routing::get, Router};
use realm_cache::SubscriberConfig;
use realm_common::{AppConfig, AppError};
use realm_service::ServiceContext;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

pub fn create_app(state: GatewayState) -> Router {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect the stores, then wire hub, connection registry and Redis listener
/// together.
///
/// The hub reports a channel's first subscriber and its last unsubscribe on
/// the topic channel; the dispatcher follows or drops the matching Redis topic.
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let services = ServiceContext::connect(&config).await?;

    let (topic_tx, topic_rx) = mpsc::unbounded_channel();
    let hub = Arc::new(ChannelHub::with_topic_listener(topic_tx));
    let connections = Arc::new(ConnectionManager::new(hub, config.hub.queue_capacity));

    let refresh =
        spawn_refresh_debouncer(Arc::clone(&connections), config.hub.control_debounce());
    let router = EventRouter::new(Arc::clone(&connections), refresh);

    let dispatcher = EventDispatcher::start(SubscriberConfig::from(&config.redis), router, topic_rx)
        .map(Arc::new)
        .map_err(|e| AppError::Cache(format!("cannot start Redis listener: {e}")))?;

    Ok(GatewayState::new(services, connections, dispatcher, config))
}

pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();
    let app = create_app(create_gateway_state(config).await?);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!(address = %addr, "Gateway listening on /gateway");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}
