//! Gateway state
//!
//! Shared handles every socket task needs: the services used to resolve
//! tokens and channel access, the local connection registry and hub, and the
//! Redis event dispatcher that feeds them.

use crate::broadcast::EventDispatcher;
use crate::connection::ConnectionManager;
use crate::hub::ChannelHub;
use realm_common::{AppConfig, JwtService};
use realm_service::{AccessService, ServiceContext};
use std::sync::Arc;

/// Cloned into every socket task
#[derive(Clone)]
pub struct GatewayState {
    services: Arc<ServiceContext>,
    connections: Arc<ConnectionManager>,
    dispatcher: Arc<EventDispatcher>,
    config: Arc<AppConfig>,
}

impl GatewayState {
    pub fn new(
        services: ServiceContext,
        connections: Arc<ConnectionManager>,
        dispatcher: Arc<EventDispatcher>,
        config: AppConfig,
    ) -> Self {
        Self {
            services: Arc::new(services),
            connections,
            dispatcher,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.services
    }

    /// Verifies Identify tokens
    pub fn jwt_service(&self) -> &JwtService {
        self.services.jwt_service()
    }

    /// Read checks for Subscribe, backed by the same store as the API
    pub fn access(&self) -> AccessService<'_> {
        AccessService::new(&self.services)
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn hub(&self) -> &ChannelHub {
        self.connections.hub()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connections", &self.connections.connection_count())
            .field("users", &self.connections.user_count())
            .field("active_channels", &self.hub().active_channels().len())
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
