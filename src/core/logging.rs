use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::app_config::AppConfig;

pub const LOG_FILE_PREFIX: &str = "gtm-traffic-core.log";

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered file logs get flushed.
pub fn init_tracing(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("Invalid log filter {:?}", config.log_filter))?;

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .try_init()
                .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;
            Ok(Some(guard))
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .try_init()
                .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;
            Ok(None)
        }
    }
}
