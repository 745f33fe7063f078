use anyhow::Result;
use async_trait::async_trait;
use http::StatusCode;

use super::report_request::ReportRequest;
use crate::domain::query::credentials::Credentials;

/// Status and body of a reporting API answer, whatever the status.
#[derive(Debug, Clone)]
pub struct RawReportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawReportResponse {
    /// Status line as printed by HTTP clients, e.g. `403 Forbidden`.
    pub fn status_line(&self) -> String {
        self.status.to_string()
    }
}

/// Sends one request to the reporting API.
///
/// Implementations own signing. An `Err` means the endpoint could not be
/// reached or the body could not be read; non-2xx statuses are returned as
/// responses.
#[async_trait]
pub trait ReportTransport: Send + Sync {
    async fn execute(
        &self,
        credentials: &Credentials,
        request: ReportRequest,
    ) -> Result<RawReportResponse>;
}
