use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::report_request::ReportRequest;
use super::report_transport::{RawReportResponse, ReportTransport};
use crate::domain::query::credentials::Credentials;

/// reqwest-backed transport.
///
/// Requests go to the configured `host` as-is, so `host` is expected to be a
/// gateway that signs requests on the way to the reporting API.
#[derive(Clone)]
pub struct ReportingHttpClient {
    client: Client,
}

impl ReportingHttpClient {
    pub fn new(user_agent: &str, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

/// `https://` is assumed when the host carries no scheme.
pub fn base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl ReportTransport for ReportingHttpClient {
    async fn execute(
        &self,
        credentials: &Credentials,
        request: ReportRequest,
    ) -> Result<RawReportResponse> {
        let url = format!("{}{}", base_url(&credentials.host), request.path_and_query);
        debug!(method = %request.method, %url, "Calling reporting API");

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .with_context(|| format!("{} {} failed", request.method, url))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body of {} {}", request.method, url))?;

        Ok(RawReportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
