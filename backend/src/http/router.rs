//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (tracing, compression, CORS).

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Upper bound for request bodies; a session upload is a few kilobytes.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// CORS policy: a single allowed origin when configured, any origin otherwise.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(str::trim).filter(|o| !o.is_empty() && *o != "*") {
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                log::warn!("Ignoring invalid CORS_ORIGIN '{}': {}", origin, e);
                AllowOrigin::from(Any)
            }
        },
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router, reading `CORS_ORIGIN` from the environment.
pub fn create_router(state: AppState) -> Router {
    let origin = std::env::var("CORS_ORIGIN").ok();
    create_router_with_cors(state, origin.as_deref())
}

/// Create the application router with an explicit CORS origin.
pub fn create_router_with_cors(state: AppState, cors_origin: Option<&str>) -> Router {
    let api = Router::new()
        // Views
        .route("/stats/{user}", get(handlers::get_stats))
        .route("/sessions/{user}", get(handlers::get_sessions))
        .route("/grade_pyramid/{user}", get(handlers::get_grade_pyramid))
        .route("/profile/{user}", get(handlers::get_profile))
        .route("/dashboard/{user}", get(handlers::get_dashboard))
        // Ingestion
        .route("/session", post(handlers::save_session))
        .route("/session/start", post(handlers::start_session))
        .route("/session/end", post(handlers::end_session))
        .route("/climb", post(handlers::log_climb));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(cors_origin)),
        )
        .with_state(state)
}
