use axum::extract::State;
use axum::Json;
use tracing::error;
use validator::Validate;

use crate::api::dto::query_dto::{QueryDataRequestDto, QueryDataResponseDto};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::query::model::DataQuery;
use crate::errors::AppError;

pub struct QueryController;

impl QueryController {
    pub async fn query_data(
        State(state): State<AppState>,
        Json(payload): Json<QueryDataRequestDto>,
    ) -> Result<Json<ApiResponse<QueryDataResponseDto>>, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::BodyParsingError(e.to_string()))?;

        let QueryDataRequestDto {
            datasource_settings,
            queries,
        } = payload;
        let queries: Vec<DataQuery> = queries.into_iter().map(Into::into).collect();

        let timeout = state.config.request_timeout;
        let result = tokio::time::timeout(
            timeout,
            state.query_service.query_data(&datasource_settings, queries),
        )
        .await
        .map_err(|_| {
            error!(timeout_secs = timeout.as_secs(), "Query batch timed out");
            AppError::Timeout(timeout.as_secs())
        })?;

        to_json(result.map(QueryDataResponseDto::from))
    }
}
