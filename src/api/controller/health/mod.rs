use axum::extract::State;
use axum::Json;

use crate::api::dto::health_dto::HealthCheckRequestDto;
use crate::api::dto::ApiResponse;
use crate::app_state::AppState;
use crate::domain::query::service::health_service::HealthCheckResult;

pub struct HealthController;

impl HealthController {
    /// "Save & test" of the datasource configuration page.
    pub async fn check_health(
        State(state): State<AppState>,
        Json(payload): Json<HealthCheckRequestDto>,
    ) -> Json<ApiResponse<HealthCheckResult>> {
        let result = state
            .health_service
            .check_health(&payload.datasource_settings, state.config.request_timeout)
            .await;

        Json(ApiResponse::ok(result))
    }
}
