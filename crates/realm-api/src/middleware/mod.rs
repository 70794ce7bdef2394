//! HTTP middleware: rate limit, request ids, tracing, timeout and CORS
//!
//! A request passes the layers in that order on its way to the handler.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use realm_common::{CorsConfig, RateLimitConfig};
use tower_governor::{
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::GlobalKeyExtractor,
    GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use crate::state::AppState;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Slow requests are cut off with a 503
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

type Limiter = Arc<GovernorConfig<GlobalKeyExtractor, NoOpMiddleware<QuantaInstant>>>;

pub fn apply_middleware(
    router: Router<AppState>,
    rate_limit: &RateLimitConfig,
    cors: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    // Layers wrap outward: the last one added sees the request first
    let router = router
        .layer(cors_layer(origin_policy(cors, is_production)))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(&REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "http",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid));

    match limiter(rate_limit) {
        Some(config) => router.layer(GovernorLayer { config }),
        None => {
            warn!(
                requests_per_second = rate_limit.requests_per_second,
                burst = rate_limit.burst,
                "Rate limit disabled: quota must be positive"
            );
            router
        }
    }
}

/// One bucket shared by every caller; `None` for a zero quota
fn limiter(config: &RateLimitConfig) -> Option<Limiter> {
    GovernorConfigBuilder::default()
        .per_second(config.requests_per_second.into())
        .burst_size(config.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish()
        .map(Arc::new)
}

#[derive(Debug, PartialEq)]
enum OriginPolicy {
    Any,
    Only(Vec<HeaderValue>),
}

/// Configured origins always win. With none configured, development allows
/// any origin and production allows none.
fn origin_policy(config: &CorsConfig, is_production: bool) -> OriginPolicy {
    if config.allowed_origins.is_empty() {
        if is_production {
            warn!("No CORS origins configured; browsers will be refused");
            return OriginPolicy::Only(Vec::new());
        }
        return OriginPolicy::Any;
    }

    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    OriginPolicy::Only(origins)
}

fn cors_layer(policy: OriginPolicy) -> CorsLayer {
    let allow_origin = match policy {
        OriginPolicy::Any => AllowOrigin::any(),
        OriginPolicy::Only(origins) => AllowOrigin::list(origins),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            REQUEST_ID_HEADER,
        ])
        .expose_headers([REQUEST_ID_HEADER])
}
