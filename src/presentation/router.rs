use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{debug_handler, health_handler, transcriptions_handler};
use crate::presentation::state::AppState;

pub const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";

/// Server-style transport adapter.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.settings.server.max_upload_bytes();

    let router = Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/audio/healthz", get(health_handler))
        .route("/v1/audio/debug", get(debug_handler))
        .route(TRANSCRIPTIONS_PATH, post(transcriptions_handler))
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    with_common_layers(router, body_limit).layer(cors)
}

/// Body limit, request id and HTTP tracing, shared by both adapters.
pub(crate) fn with_common_layers(router: Router, body_limit: usize) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
}
