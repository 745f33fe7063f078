use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckRequestDto {
    #[serde(default)]
    pub datasource_settings: Value,
}
