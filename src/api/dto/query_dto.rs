use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::domain::query::model::{DataQuery, LabeledSeries, QuerySlots};
use crate::domain::query::query_error::QueryError;

/// A batch of panel queries plus the datasource settings they run with.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QueryDataRequestDto {
    #[serde(default)]
    pub datasource_settings: Value,
    #[validate(nested)]
    pub queries: Vec<DataQueryDto>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DataQueryDto {
    #[validate(length(min = 1, message = "refId must not be empty"))]
    pub ref_id: String,
    pub time_range: TimeRangeDto,
    /// Query editor fields; decoded per query so a bad model fails only that query.
    #[serde(default)]
    pub model: Value,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeRangeDto {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl From<DataQueryDto> for DataQuery {
    fn from(dto: DataQueryDto) -> Self {
        DataQuery {
            ref_id: dto.ref_id,
            from: dto.time_range.from,
            to: dto.time_range.to,
            model: dto.model,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryDataResponseDto {
    pub responses: BTreeMap<String, DataResponseDto>,
}

/// Result of one query: frames on success, an error message otherwise.
#[derive(Debug, Serialize)]
pub struct DataResponseDto {
    pub frames: Vec<FrameDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FrameDto {
    pub name: String,
    pub fields: Vec<FieldDto>,
}

#[derive(Debug, Serialize)]
pub struct FieldDto {
    pub name: String,
    pub values: FieldValues,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FieldValues {
    Time(Vec<DateTime<Utc>>),
    Number(Vec<f64>),
}

impl From<LabeledSeries> for FrameDto {
    fn from(series: LabeledSeries) -> Self {
        let (times, values): (Vec<_>, Vec<_>) =
            series.points.iter().map(|p| (p.time, p.value)).unzip();

        FrameDto {
            name: "response".to_string(),
            fields: vec![
                FieldDto {
                    name: "time".to_string(),
                    values: FieldValues::Time(times),
                },
                FieldDto {
                    name: series.label,
                    values: FieldValues::Number(values),
                },
            ],
        }
    }
}

impl From<Result<LabeledSeries, QueryError>> for DataResponseDto {
    fn from(result: Result<LabeledSeries, QueryError>) -> Self {
        match result {
            Ok(series) => DataResponseDto {
                frames: vec![series.into()],
                error: None,
            },
            Err(e) => DataResponseDto {
                frames: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

impl From<QuerySlots> for QueryDataResponseDto {
    fn from(slots: QuerySlots) -> Self {
        QueryDataResponseDto {
            responses: slots
                .into_iter()
                .map(|(ref_id, result)| (ref_id, result.into()))
                .collect(),
        }
    }
}
