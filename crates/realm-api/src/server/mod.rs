//! API process wiring: state, bootstrap tasks and the listener

use std::net::SocketAddr;

use axum::Router;
use realm_common::{AppConfig, AppError};
use realm_db::run_migrations;
use realm_service::{ServiceContext, SystemService};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.is_production(),
    );

    api.merge(health_routes()).with_state(state)
}

/// Connect the stores and wrap them in router state
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let services = ServiceContext::connect(&config).await?;
    Ok(AppState::new(services, config))
}

/// Startup tasks: schema migration and the General channel.
///
/// A General channel that cannot be created is logged and skipped; the
/// server still starts so that read paths can report the missing schema.
pub async fn bootstrap(state: &AppState) -> Result<(), AppError> {
    let bootstrap = &state.config().bootstrap;

    if bootstrap.run_migrations {
        run_migrations(state.service_context().pool())
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    }

    if bootstrap.general_channel {
        match SystemService::new(state.service_context())
            .ensure_general_channel()
            .await
        {
            Ok(channel) => info!(channel_id = %channel.id, "General channel ready"),
            Err(e) => warn!(error = %e, "Could not ensure the General channel"),
        }
    }

    Ok(())
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!(address = %addr, "API server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    bootstrap(&state).await?;

    let app = create_app(state);
    run_server(app, &addr).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use realm_cache::{RedisPool, RedisPoolConfig};
    use realm_common::{
        AppSettings, BootstrapConfig, CorsConfig, DatabaseConfig, Environment, HubConfig,
        JwtConfig, JwtService, RateLimitConfig, RedisConfig, ServerConfig, SnowflakeConfig,
    };
    use realm_core::{Snowflake, SnowflakeGenerator};
    use realm_db::PgPool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    fn config() -> AppConfig {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        AppConfig {
            app: AppSettings {
                name: "neon-realm".to_string(),
                env: Environment::Development,
            },
            api: server.clone(),
            gateway: server,
            database: DatabaseConfig {
                url: "postgres://realm@127.0.0.1:1/realm".to_string(),
                max_connections: 1,
                min_connections: 0,
            },
            redis: RedisConfig {
                url: "redis://127.0.0.1:1".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: SECRET.to_string(),
                access_token_expiry: 60,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: 1000,
                burst: 1000,
            },
            cors: CorsConfig::default(),
            snowflake: SnowflakeConfig::default(),
            hub: HubConfig::default(),
            bootstrap: BootstrapConfig {
                run_migrations: false,
                general_channel: false,
            },
        }
    }

    /// Router over lazy pools: only requests rejected before any store is
    /// touched can be exercised here
    fn app() -> Router {
        let config = config();
        let pool = PgPool::connect_lazy(&config.database.url).unwrap();
        let redis = RedisPool::new(RedisPoolConfig::from(&config.redis)).unwrap();
        let services = ServiceContext::new(
            pool,
            Arc::new(redis),
            Arc::new(JwtService::new(SECRET, 60)),
            Arc::new(SnowflakeGenerator::new(0)),
        );
        create_app(AppState::new(services, config))
    }

    fn token() -> String {
        JwtService::new(SECRET, 60)
            .issue_access_token(Snowflake::new(42))
            .unwrap()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_liveness_needs_no_store() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_and_invalid_tokens_are_distinguished() {
        let request = Request::post("/api/channels")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "MISSING_AUTHORIZATION");

        let request = Request::post("/api/channels")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_before_services() {
        let request = Request::post("/api/channels")
            .header(header::AUTHORIZATION, format!("Bearer {}", token()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let response = app()
            .oneshot(Request::get("/api/channels/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
