use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures of a traffic query.
///
/// `Configuration` is fatal for a whole batch because no request can be built
/// without credentials. Every other variant is recorded against the single
/// query that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Invalid datasource configuration: {0}")]
    Configuration(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Enter zone names")]
    NoZonesSpecified,

    #[error("Time range is before available data (oldest available: {oldest_available})")]
    WindowBeforeRetentionHorizon { oldest_available: DateTime<Utc> },

    #[error("Reporting API communication error: {0}")]
    Transport(String),

    /// Non-2xx answer from the reporting API. `message` is the first error
    /// title of the body, or the HTTP status line when the body is not the
    /// documented error shape.
    #[error("{message}")]
    RemoteRejection { status: u16, message: String },

    #[error("Unexpected reporting API response: {0}")]
    UnexpectedResponse(String),

    #[error("Malformed sample timestamp {value:?}: {reason}")]
    MalformedSample { value: String, reason: String },
}
