use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::query_error::QueryError;

/// Datasource settings as stored by the configuration front end.
///
/// The four values are opaque tokens handed to the transport; only `host`
/// is required to address the reporting API.
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Credentials {
    pub client_secret: String,
    #[validate(length(min = 1, message = "host is not configured"))]
    pub host: String,
    pub access_token: String,
    pub client_token: String,
}

impl Credentials {
    /// Decodes the datasource settings JSON.
    pub fn from_settings(settings: &Value) -> Result<Self, QueryError> {
        if !settings.is_object() {
            return Err(QueryError::Configuration(
                "settings must be a JSON object".to_string(),
            ));
        }

        let credentials = Credentials::deserialize(settings)
            .map_err(|e| QueryError::Configuration(e.to_string()))?;

        credentials
            .validate()
            .map_err(|e| QueryError::Configuration(e.to_string()))?;

        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("client_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("client_token", &"<redacted>")
            .finish()
    }
}
