use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnNull, NoneAsEmptyString};

use super::query_error::QueryError;

/// One query of a batch as received from the panel: an identifier, a time
/// range, and the still-encoded query model.
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub ref_id: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub model: Value,
}

/// Query editor fields.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryModel {
    pub data_source_id: u64,
    pub interval_ms: u64,
    pub max_data_points: u32,
    #[serde_as(as = "DefaultOnNull")]
    pub zone_names: String,
    #[serde_as(as = "NoneAsEmptyString")]
    pub metric_name: Option<String>,
}

impl QueryModel {
    pub fn decode(model: &Value) -> Result<Self, QueryError> {
        if !model.is_object() {
            return Err(QueryError::InvalidQuery(
                "query model must be a JSON object".to_string(),
            ));
        }
        QueryModel::deserialize(model).map_err(|e| QueryError::InvalidQuery(e.to_string()))
    }

    /// The configured metric name, or `"<zone names> hits"`.
    pub fn label(&self) -> String {
        self.metric_name
            .clone()
            .unwrap_or_else(|| format!("{} hits", self.zone_names))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    pub label: String,
    pub points: Vec<SeriesPoint>,
}

/// Per-query outcome of a batch, keyed by `ref_id`.
pub type QuerySlots = BTreeMap<String, Result<LabeledSeries, QueryError>>;
