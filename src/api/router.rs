use std::any::Any;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    RateLimitState,
};
use super::participants;
use super::state::AppState;
use super::stats;
use super::types::error::GENERIC_FAILURE_MESSAGE;
use super::types::ApiError;
use crate::config::AppConfig;

/// Routes under `/api`
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/participants",
            get(participants::list_participants).post(participants::register_participant),
        )
        .route(
            "/participants/{id}/status",
            patch(participants::update_participant_status),
        )
        .route("/stats", get(stats::get_stats))
}

/// Create the full router with application state
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    let mut api = api_routes().method_not_allowed_fallback(endpoint_not_found);

    if config.rate_limit.enabled {
        api = api.layer(middleware::from_fn_with_state(
            RateLimitState::new(state.rate_limiter.clone(), config.rate_limit.trust_proxy),
            rate_limit_middleware,
        ));
    }

    let app = Router::new()
        .nest("/api", api)
        .fallback(endpoint_not_found)
        .with_state(state);

    with_layers(app, config)
}

/// Cross-cutting layers, innermost first
fn with_layers(app: Router, config: &AppConfig) -> Router {
    app.layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&config.cors.allowed_origin))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn endpoint_not_found() -> ApiError {
    ApiError::not_found("API endpoint not found")
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!(panic = %detail, "Handler panicked");

    ApiError::internal(GENERIC_FAILURE_MESSAGE).into_response()
}

/// CORS for the single front-end origin, with credentials
///
/// A wildcard cannot be combined with credentials, so `*` disables
/// cross-origin access just like an unparseable origin.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    if allowed_origin.trim() == "*" {
        warn!("Wildcard CORS origin cannot allow credentials, cross-origin requests disabled");
        return layer;
    }

    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(origin = %allowed_origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            layer
        }
    }
}
