//! Datasource routes (e.g., /api/v1/query)

use axum::{routing::post, Router};

use crate::api::controller::health::HealthController;
use crate::api::controller::query::QueryController;
use crate::app_state::AppState;

/// Build the router for the datasource backend under /api/v1
pub fn datasource_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(QueryController::query_data))
        .route("/health", post(HealthController::check_health))
}
