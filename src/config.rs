//! Configuration management for teslabridge
//!
//! This module handles loading, validation, and management of the bridge
//! configuration from YAML files, with an environment variable override for
//! the refresh token.

use crate::accessory::TemperatureDisplayUnits;
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

mod defaults;

/// Environment variable that overrides `accessory.token`
pub const REFRESH_TOKEN_ENV: &str = "TESLABRIDGE_REFRESH_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Accessory identity and credentials
    pub accessory: AccessoryConfig,

    /// Vehicle and token API endpoints
    pub api: ApiConfig,

    /// Cache lifetimes, wake polling and delayed updates
    pub timings: TimingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// HTTP accessory host binding
    pub web: WebConfig,
}

/// Accessory identity: the `{name, token, vin}` triple
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoryConfig {
    /// Display name; service names are derived from it
    pub name: String,

    /// Long-lived OAuth2 refresh token
    pub token: String,

    /// VIN of the vehicle to control; first vehicle on the account when unset
    pub vin: Option<String>,

    /// Units reported by the thermostat's display-units characteristic
    pub display_units: TemperatureDisplayUnits,
}

/// Vehicle API and token endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Owner API base, without trailing slash
    pub base_url: String,

    /// OAuth2 token endpoint
    pub auth_url: String,

    /// OAuth2 client id used for the refresh exchange
    pub client_id: String,

    /// OAuth2 scope requested on refresh
    pub scope: String,

    /// `user-agent` header sent to both endpoints
    pub user_agent: String,

    /// `x-tesla-user-agent` header sent to both endpoints
    pub x_tesla_user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Timing knobs for caches, wake polling and compensating updates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a resolved vehicle id stays valid
    pub vehicle_id_ttl_ms: u64,

    /// Minimum spacing between two wake requests
    pub wake_min_interval_ms: u64,

    /// Delay between wake status polls
    pub wake_poll_interval_ms: u64,

    /// Maximum number of wake status polls
    pub wake_poll_attempts: u32,

    /// Climate auto-stop re-check delay after conditioning is switched on
    pub conditioning_auto_stop_secs: u64,

    /// Horn and lights switches fall back to off after this delay
    pub switch_reset_ms: u64,

    /// Charging switch falls back to off after a "complete"/"not_charging" answer
    pub charging_reset_ms: u64,

    /// Delay before a lock's current state follows its target
    pub lock_update_delay_ms: u64,
}

impl TimingConfig {
    pub fn vehicle_id_ttl(&self) -> Duration {
        Duration::from_millis(self.vehicle_id_ttl_ms)
    }

    pub fn wake_min_interval(&self) -> Duration {
        Duration::from_millis(self.wake_min_interval_ms)
    }

    pub fn wake_poll_interval(&self) -> Duration {
        Duration::from_millis(self.wake_poll_interval_ms)
    }

    pub fn conditioning_auto_stop(&self) -> Duration {
        Duration::from_secs(self.conditioning_auto_stop_secs)
    }

    pub fn switch_reset(&self) -> Duration {
        Duration::from_millis(self.switch_reset_ms)
    }

    pub fn charging_reset(&self) -> Duration {
        Duration::from_millis(self.charging_reset_ms)
    }

    pub fn lock_update_delay(&self) -> Duration {
        Duration::from_millis(self.lock_update_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file (or directory); empty disables file logging
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

/// HTTP accessory host binding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Serve the HTTP host at all
    pub enabled: bool,

    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = ["teslabridge.yaml", "/etc/teslabridge/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(REFRESH_TOKEN_ENV)
            && !token.trim().is_empty()
        {
            self.accessory.token = token.trim().to_string();
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.accessory.name.trim().is_empty() {
            return Err(BridgeError::validation(
                "accessory.name",
                "Name cannot be empty",
            ));
        }

        if self.accessory.token.trim().is_empty() {
            return Err(BridgeError::validation(
                "accessory.token",
                "Refresh token cannot be empty",
            ));
        }

        if let Some(vin) = &self.accessory.vin
            && vin.trim().len() != 17
        {
            return Err(BridgeError::validation(
                "accessory.vin",
                "VIN must be 17 characters",
            ));
        }

        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.auth_url", &self.api.auth_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(BridgeError::validation(field, "Must be an http(s) URL"));
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(BridgeError::validation(
                "api.timeout_secs",
                "Must be greater than 0",
            ));
        }

        if self.timings.wake_poll_attempts == 0 {
            return Err(BridgeError::validation(
                "timings.wake_poll_attempts",
                "Must be greater than 0",
            ));
        }

        if self.timings.wake_poll_interval_ms == 0 {
            return Err(BridgeError::validation(
                "timings.wake_poll_interval_ms",
                "Must be greater than 0",
            ));
        }

        if self.timings.conditioning_auto_stop_secs == 0 {
            return Err(BridgeError::validation(
                "timings.conditioning_auto_stop_secs",
                "Must be greater than 0",
            ));
        }

        crate::logging::parse_log_level(&self.logging.level)
            .map_err(|_| BridgeError::validation("logging.level", "Unknown log level"))?;

        if self.web.enabled && self.web.port == 0 {
            return Err(BridgeError::validation(
                "web.port",
                "Port must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.accessory.token = "refresh-token".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.accessory.name, "Tesla");
        assert_eq!(config.timings.vehicle_id_ttl_ms, 10_000);
        assert_eq!(config.timings.wake_poll_attempts, 20);
        assert_eq!(config.web.port, 8089);
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.accessory.token = String::new();
        assert!(config.validate().is_err());

        config = valid_config();
        config.accessory.vin = Some("SHORT".to_string());
        assert!(config.validate().is_err());

        config = valid_config();
        config.timings.wake_poll_attempts = 0;
        assert!(config.validate().is_err());

        config = valid_config();
        config.logging.level = "LOUD".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "accessory:\n  name: Model 3\n  token: abc\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.accessory.name, "Model 3");
        assert_eq!(config.accessory.token, "abc");
        assert_eq!(config.timings.charging_reset_ms, 300);
        assert_eq!(config.api.client_id, "ownerapi");
    }
}
