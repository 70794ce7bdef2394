//! Router state

use std::sync::Arc;

use realm_common::{AppConfig, JwtService};
use realm_service::ServiceContext;

/// Handed to every handler by axum; cheap to clone
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Shared>,
}

struct Shared {
    services: ServiceContext,
    config: AppConfig,
}

impl AppState {
    pub fn new(services: ServiceContext, config: AppConfig) -> Self {
        Self {
            inner: Arc::new(Shared { services, config }),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.inner.services
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Verifies bearer tokens in the auth extractors
    pub fn jwt_service(&self) -> &JwtService {
        self.inner.services.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("env", &self.inner.config.app.env)
            .field("bind", &self.inner.config.api.address())
            .finish_non_exhaustive()
    }
}
