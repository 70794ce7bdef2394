//! `GET /health` and `GET /health/ready`

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use realm_service::dto::{HealthChecks, HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// A probe that has not answered by then counts as unhealthy
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Liveness: the process is up and serving
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness: Postgres and Redis both answer. 503 otherwise.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let database = tokio::time::timeout(PROBE_TIMEOUT, ctx.pool().acquire());
    let redis = tokio::time::timeout(PROBE_TIMEOUT, ctx.redis_pool().health_check());
    let (database, redis) = tokio::join!(database, redis);

    let checks = HealthChecks {
        database: matches!(database, Ok(Ok(_))).into(),
        redis: matches!(redis, Ok(Ok(()))).into(),
    };
    let response = ReadinessResponse::from_checks(checks);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        tracing::warn!(checks = ?response.checks, "Readiness probe failed");
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
