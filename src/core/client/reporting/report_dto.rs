//! Wire shapes of the "load balancing DNS traffic, all properties" report.

use serde::{Deserialize, Serialize};

/// POST body of a report-data request, e.g.
/// `{"objectType":"fpdomain","objectIds":["example.akadns.net"],"metrics":["startdatetime","hits"]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDataRequestDto {
    pub object_type: String,
    pub object_ids: Vec<String>,
    pub metrics: Vec<String>,
}

impl ReportDataRequestDto {
    pub fn for_zones(zones: &[String]) -> Self {
        Self {
            object_type: "fpdomain".to_string(),
            object_ids: zones.to_vec(),
            metrics: vec!["startdatetime".to_string(), "hits".to_string()],
        }
    }
}

/// One sample row. Both values arrive as strings; `hits` may be `"N/A"`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRowDto {
    #[serde(rename = "startdatetime")]
    pub start_date_time: String,
    pub hits: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportMetadataDto {
    pub available_data_ends: String,
    pub end: String,
    pub interval: String,
    pub name: String,
    pub object_ids: Vec<String>,
    pub object_type: String,
    pub output_type: String,
    pub row_count: i64,
    pub start: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportDataResponseDto {
    pub data: Vec<ReportRowDto>,
    #[serde(default)]
    pub metadata: ReportMetadataDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEntryDto {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Problem-details body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponseDto {
    pub errors: Vec<ApiErrorEntryDto>,
    #[serde(default)]
    pub instance: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ApiErrorResponseDto {
    /// First error title, falling back to the top-level title.
    pub fn headline(&self) -> Option<&str> {
        self.errors
            .first()
            .map(|e| e.title.as_str())
            .or(Some(self.title.as_str()))
            .filter(|t| !t.is_empty())
    }
}
