use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Process settings, read from `GTM_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    pub log_filter: String,
    /// Daily-rotated log files go here when set; stdout otherwise.
    pub log_dir: Option<String>,
    /// Deadline for a whole query batch or health check.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: format!("gtm-traffic-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            server_addr: var("GTM_SERVER_ADDR").unwrap_or(defaults.server_addr),
            log_filter: var("GTM_LOG_FILTER").unwrap_or(defaults.log_filter),
            log_dir: var("GTM_LOG_DIR"),
            request_timeout: secs(var("GTM_REQUEST_TIMEOUT_SECS"), "GTM_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout),
            connect_timeout: secs(var("GTM_CONNECT_TIMEOUT_SECS"), "GTM_CONNECT_TIMEOUT_SECS")?
                .unwrap_or(defaults.connect_timeout),
            user_agent: var("GTM_HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }
}

fn secs(value: Option<String>, key: &str) -> Result<Option<Duration>> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .with_context(|| format!("{key} must be a whole number of seconds, got {v:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.log_dir.is_none());
        assert!(config.user_agent.starts_with("gtm-traffic-core/"));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GTM_SERVER_ADDR", "127.0.0.1:9000"),
            ("GTM_LOG_FILTER", "gtm_traffic_core=debug"),
            ("GTM_LOG_DIR", "/var/log/gtm"),
            ("GTM_REQUEST_TIMEOUT_SECS", " 5 "),
            ("GTM_CONNECT_TIMEOUT_SECS", ""),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:9000");
        assert_eq!(config.log_filter, "gtm_traffic_core=debug");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/gtm"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
    }

    #[test]
    fn rejects_non_numeric_timeouts() {
        let err = AppConfig::from_lookup(lookup(&[("GTM_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("GTM_REQUEST_TIMEOUT_SECS"));
    }
}
