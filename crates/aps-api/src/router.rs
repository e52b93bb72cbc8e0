use axum::{
    Json, Router, http::StatusCode, middleware, response::IntoResponse, routing::get,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    metrics::track_metrics,
    middleware::{apply_security_headers, create_cors_layer, request_id_middleware},
    state::ApiState,
    v1,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .nest("/v1", v1::routes())
        .fallback(handler_404)
}

/// The router with state and the standard middleware stack applied
pub fn app(state: ApiState, allowed_origins: Vec<String>) -> Router {
    let environment = state.environment;

    let app = router()
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(create_cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http());

    // Outermost, so the span covers everything below
    apply_security_headers(app, environment).layer(middleware::from_fn(request_id_middleware))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}
