use std::sync::Arc;

use anyhow::Result;

use crate::core::client::reporting::report_transport::ReportTransport;
use crate::core::client::reporting::reporting_http_client::ReportingHttpClient;
use crate::core::config::app_config::AppConfig;
use crate::domain::query::service::health_service::HealthService;
use crate::domain::query::service::query_service::QueryService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub query_service: Arc<QueryService>,
    pub health_service: Arc<HealthService>,
}

pub fn build_app_state(config: AppConfig) -> Result<AppState> {
    let transport = ReportingHttpClient::new(&config.user_agent, config.connect_timeout)?;
    Ok(build_app_state_with_transport(config, Arc::new(transport)))
}

/// Both services share the one transport.
pub fn build_app_state_with_transport(
    config: AppConfig,
    transport: Arc<dyn ReportTransport>,
) -> AppState {
    AppState {
        config: Arc::new(config),
        query_service: Arc::new(QueryService::new(transport.clone())),
        health_service: Arc::new(HealthService::new(transport)),
    }
}
