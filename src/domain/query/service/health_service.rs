use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use http::StatusCode;
use serde::Serialize;
use tracing::{error, info};

use crate::core::client::reporting::report_request::{ReportRequest, PROBE_ZONE};
use crate::core::client::reporting::report_transport::ReportTransport;
use crate::domain::query::credentials::Credentials;
use crate::domain::query::interval::Interval;
use crate::domain::query::report_mapper::decode_error_body;
use crate::domain::query::window::{round_to_interval, AlignedWindow};

/// Error title the API returns for the probe zone when credentials work.
pub const EXPECTED_PROBE_TITLE: &str = "Some of the requested objects are unauthorized: [-fake-]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Error,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthCheckResult {
    fn new(status: HealthStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn failed(message: String) -> Self {
        error!(%message, "Datasource health check failed");
        Self::new(HealthStatus::Error, message)
    }
}

/// Verifies that the configured credentials can reach the reporting API.
///
/// Asks for the last five minutes of a zone that cannot exist. A working
/// datasource gets a 403 naming that zone; any other answer means the
/// credentials or the host are wrong.
pub struct HealthService {
    transport: Arc<dyn ReportTransport>,
}

impl HealthService {
    pub fn new(transport: Arc<dyn ReportTransport>) -> Self {
        Self { transport }
    }

    /// Runs the probe, giving up after `deadline`.
    pub async fn check_health(
        &self,
        settings: &serde_json::Value,
        deadline: std::time::Duration,
    ) -> HealthCheckResult {
        match tokio::time::timeout(deadline, self.check_health_at(settings, Utc::now())).await {
            Ok(result) => result,
            Err(_) => HealthCheckResult::failed(format!(
                "Datasource failed: no response within {deadline:?}"
            )),
        }
    }

    pub(crate) async fn check_health_at(
        &self,
        settings: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> HealthCheckResult {
        let credentials = match Credentials::from_settings(settings) {
            Ok(c) => c,
            Err(e) => {
                error!(?e, "Failed to decode datasource settings for health check");
                return HealthCheckResult::new(
                    HealthStatus::Unknown,
                    format!("Internal error. Failed to decode datasource settings: {e}"),
                );
            }
        };

        let interval = Interval::FiveMinutes;
        let window = AlignedWindow {
            from: round_to_interval(now - Duration::minutes(5), interval),
            to: round_to_interval(now, interval),
        };
        let request = ReportRequest::probe(&window, interval, PROBE_ZONE);
        info!(url = %request.path_and_query, "Probing reporting API");

        let raw = match self.transport.execute(&credentials, request).await {
            Ok(raw) => raw,
            Err(e) => return HealthCheckResult::failed(format!("{e:#}")),
        };
        info!(status = %raw.status, "Probe answered (403 expected)");

        let body = decode_error_body(&raw);

        if raw.status != StatusCode::FORBIDDEN {
            let detail = body
                .as_ref()
                .and_then(|b| b.headline())
                .map(str::to_string)
                .unwrap_or_else(|| raw.status_line());
            return HealthCheckResult::failed(format!(
                "Unexpected status code. Datasource failed: {detail}"
            ));
        }

        let Some(body) = body else {
            return HealthCheckResult::failed(format!(
                "Unexpected response format. Datasource failed: {}",
                raw.status_line()
            ));
        };

        let title = body.headline().unwrap_or_default();
        if title != EXPECTED_PROBE_TITLE {
            return HealthCheckResult::failed(format!(
                "Unexpected error type. Datasource failed: {title}"
            ));
        }

        HealthCheckResult::new(HealthStatus::Ok, "Data source is working")
    }
}
