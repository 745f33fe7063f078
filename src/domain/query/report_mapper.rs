use chrono::DateTime;
use tracing::{debug, info};

use super::model::SeriesPoint;
use super::query_error::QueryError;
use crate::core::client::reporting::report_dto::{
    ApiErrorResponseDto, ReportDataResponseDto, ReportRowDto,
};
use crate::core::client::reporting::report_transport::RawReportResponse;

/// Value the API reports for buckets without data.
const NOT_AVAILABLE: &str = "N/A";

/// Message for a non-2xx answer: the first error title of a problem-details
/// body, else the HTTP status line.
pub fn rejection_message(raw: &RawReportResponse) -> String {
    decode_error_body(raw)
        .as_ref()
        .and_then(ApiErrorResponseDto::headline)
        .map(str::to_string)
        .unwrap_or_else(|| raw.status_line())
}

pub fn decode_error_body(raw: &RawReportResponse) -> Option<ApiErrorResponseDto> {
    let body: ApiErrorResponseDto = serde_json::from_slice(&raw.body).ok()?;
    debug!(
        instance = %body.instance,
        kind = %body.kind,
        error_kinds = ?body.errors.iter().map(|e| e.kind.as_str()).collect::<Vec<_>>(),
        "Decoded reporting API error body"
    );
    Some(body)
}

/// Turns a report-data answer into series points, in row order.
pub fn map_report_response(raw: &RawReportResponse) -> Result<Vec<SeriesPoint>, QueryError> {
    if !raw.status.is_success() {
        let message = rejection_message(raw);
        info!(status = %raw.status, %message, "Reporting API rejected the query");
        return Err(QueryError::RemoteRejection {
            status: raw.status.as_u16(),
            message,
        });
    }

    let report: ReportDataResponseDto = serde_json::from_slice(&raw.body)
        .map_err(|e| QueryError::UnexpectedResponse(e.to_string()))?;

    let metadata = &report.metadata;
    info!(
        rows = report.data.len(),
        row_count = metadata.row_count,
        interval = %metadata.interval,
        start = %metadata.start,
        end = %metadata.end,
        available_data_ends = %metadata.available_data_ends,
        "Received traffic report"
    );
    debug!(
        name = %metadata.name,
        version = %metadata.version,
        output_type = %metadata.output_type,
        object_type = %metadata.object_type,
        object_ids = ?metadata.object_ids,
        "Report metadata"
    );

    report.data.iter().map(map_row).collect()
}

fn map_row(row: &ReportRowDto) -> Result<SeriesPoint, QueryError> {
    let millis: i64 = row
        .start_date_time
        .parse()
        .map_err(|e: std::num::ParseIntError| QueryError::MalformedSample {
            value: row.start_date_time.clone(),
            reason: e.to_string(),
        })?;

    let time = DateTime::from_timestamp_millis(millis).ok_or_else(|| QueryError::MalformedSample {
        value: row.start_date_time.clone(),
        reason: "timestamp out of range".to_string(),
    })?;

    // Missing buckets come back as "N/A" and plot as zero.
    let value = row.hits.parse::<f64>().unwrap_or_else(|_| {
        if row.hits != NOT_AVAILABLE {
            debug!(hits = %row.hits, %time, "Non-numeric hits value treated as 0");
        }
        0.0
    });

    Ok(SeriesPoint { time, value })
}
