//! OAuth2 refresh-token exchange
//!
//! The bridge is configured with a long-lived refresh token and trades it for
//! a bearer token once per process.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::owner::default_headers;
use crate::config::ApiConfig;
use crate::error::{BridgeError, Result};
use crate::logging::get_logger;

/// Tokens handed back by the token endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Exchanges a refresh credential for a bearer token
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    async fn exchange(&self, refresh_token: &str) -> Result<TokenGrant>;
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    refresh_token: &'a str,
    scope: &'a str,
}

/// Token endpoint client over `reqwest`
pub struct OAuthTokenClient {
    http: reqwest::Client,
    auth_url: String,
    client_id: String,
    scope: String,
    logger: crate::logging::StructuredLogger,
}

impl OAuthTokenClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers(config)?)
            .build()?;
        Ok(Self {
            http,
            auth_url: config.auth_url.clone(),
            client_id: config.client_id.clone(),
            scope: config.scope.clone(),
            logger: get_logger("auth"),
        })
    }
}

#[async_trait::async_trait]
impl TokenSource for OAuthTokenClient {
    async fn exchange(&self, refresh_token: &str) -> Result<TokenGrant> {
        let body = RefreshRequest {
            grant_type: "refresh_token",
            client_id: &self.client_id,
            refresh_token,
            scope: &self.scope,
        };

        let resp = self
            .http
            .post(&self.auth_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                self.logger
                    .error(&format!("Token exchange request failed: {}", e));
                BridgeError::auth(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            self.logger.error(&format!(
                "Token endpoint returned {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            ));
            return Err(BridgeError::auth(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let grant: TokenGrant = resp
            .json()
            .await
            .map_err(|e| BridgeError::auth(format!("malformed token response: {}", e)))?;
        if grant.access_token.is_empty() {
            return Err(BridgeError::auth("token response carried no access_token"));
        }
        self.logger.debug("Exchanged refresh token for bearer token");
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_request_shape() {
        let body = RefreshRequest {
            grant_type: "refresh_token",
            client_id: "ownerapi",
            refresh_token: "rt",
            scope: "openid email offline_access",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["grant_type"], "refresh_token");
        assert_eq!(json["client_id"], "ownerapi");
        assert_eq!(json["scope"], "openid email offline_access");
    }

    #[test]
    fn grant_parses_minimal_response() {
        let grant: TokenGrant = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(grant.access_token, "abc");
        assert!(grant.expires_in.is_none());
    }
}
