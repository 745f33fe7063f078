use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::app_state::AppState;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    Router::new()
        // Root route
        .route("/", get(root))
        // Liveness
        .route("/health", get(health_check))
        // API v1
        .nest("/api/v1", crate::api::routes::datasource_routes::datasource_routes())
        // Fallback handler for 404
        .fallback(handler_404)
        .layer(CorsLayer::very_permissive())
}

async fn root() -> &'static str {
    "GTM traffic datasource is running!"
}

async fn health_check() -> &'static str {
    "OK"
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "The requested resource was not found" })),
    )
}
