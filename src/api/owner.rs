use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::VehicleApi;
use super::types::{
    ApiEnvelope, CommandResponse, DriveState, VehicleCommand, VehicleData, VehicleId,
    VehicleSummary,
};
use crate::config::ApiConfig;
use crate::error::{BridgeError, Result};
use crate::logging::get_logger;

pub(crate) const X_TESLA_USER_AGENT: &str = "x-tesla-user-agent";

/// Owner API client over `reqwest`
pub struct OwnerApiClient {
    http: reqwest::Client,
    base_url: String,
    logger: crate::logging::StructuredLogger,
}

impl OwnerApiClient {
    /// Create a client from the API section of the configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers(config)?)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            logger: get_logger("owner_api"),
        })
    }

    fn vehicle_url(&self, id: VehicleId, tail: &str) -> String {
        format!("{}/api/1/vehicles/{}/{}", self.base_url, id, tail)
    }

    async fn get<T: DeserializeOwned>(&self, token: &str, url: &str) -> Result<T> {
        self.logger.trace(&format!("GET {}", url));
        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;
        unwrap_envelope(url, resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        token: &str,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        self.logger.trace(&format!("POST {}", url));
        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(body)
            .send()
            .await?;
        unwrap_envelope(url, resp).await
    }
}

pub(crate) fn default_headers(config: &ApiConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent)
            .map_err(|e| BridgeError::config(format!("Invalid user_agent: {}", e)))?,
    );
    headers.insert(
        HeaderName::from_static(X_TESLA_USER_AGENT),
        HeaderValue::from_str(&config.x_tesla_user_agent)
            .map_err(|e| BridgeError::config(format!("Invalid x_tesla_user_agent: {}", e)))?,
    );
    Ok(headers)
}

async fn unwrap_envelope<T: DeserializeOwned>(url: &str, resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        // 408 is how the backend reports a sleeping or unreachable vehicle
        let detail = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&text)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| text.chars().take(200).collect());
        return Err(BridgeError::api(format!("{} returned {}: {}", url, status, detail)));
    }

    let envelope: ApiEnvelope<T> = serde_json::from_str(&text)?;
    if let Some(err) = envelope.error {
        let detail = envelope.error_description.unwrap_or_default();
        return Err(BridgeError::api(format!("{} {}", err, detail).trim().to_string()));
    }
    envelope
        .response
        .ok_or_else(|| BridgeError::api(format!("{} returned an empty response", url)))
}

#[async_trait::async_trait]
impl VehicleApi for OwnerApiClient {
    async fn vehicles(&self, token: &str) -> Result<Vec<VehicleSummary>> {
        let url = format!("{}/api/1/vehicles", self.base_url);
        self.get(token, &url).await
    }

    async fn vehicle_data(&self, token: &str, id: VehicleId) -> Result<VehicleData> {
        let url = self.vehicle_url(id, "vehicle_data");
        self.get(token, &url).await
    }

    async fn drive_state(&self, token: &str, id: VehicleId) -> Result<DriveState> {
        let url = self.vehicle_url(id, "data_request/drive_state");
        self.get(token, &url).await
    }

    async fn command(
        &self,
        token: &str,
        id: VehicleId,
        command: VehicleCommand,
    ) -> Result<CommandResponse> {
        let url = self.vehicle_url(id, &format!("command/{}", command.endpoint()));
        self.post(token, &url, &command.body()).await
    }

    async fn wake_up(&self, token: &str, id: VehicleId) -> Result<VehicleSummary> {
        let url = self.vehicle_url(id, "wake_up");
        self.post(token, &url, &serde_json::json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_urls_strip_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://owner-api.example.com/".to_string(),
            ..ApiConfig::default()
        };
        let client = OwnerApiClient::new(&config).unwrap();
        assert_eq!(
            client.vehicle_url(VehicleId(42), "command/honk_horn"),
            "https://owner-api.example.com/api/1/vehicles/42/command/honk_horn"
        );
    }

    #[test]
    fn default_headers_carry_user_agents() {
        let headers = default_headers(&ApiConfig::default()).unwrap();
        assert!(headers.contains_key(USER_AGENT));
        assert!(
            headers
                .get(X_TESLA_USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("TeslaApp/"))
        );
    }

    #[test]
    fn invalid_header_value_is_config_error() {
        let config = ApiConfig {
            user_agent: "bad\nagent".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            OwnerApiClient::new(&config),
            Err(BridgeError::Config { .. })
        ));
    }
}
