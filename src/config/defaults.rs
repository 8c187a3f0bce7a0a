use super::*;

impl Default for AccessoryConfig {
    fn default() -> Self {
        Self {
            name: "Tesla".to_string(),
            token: String::new(),
            vin: None,
            display_units: TemperatureDisplayUnits::Fahrenheit,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://owner-api.teslamotors.com".to_string(),
            auth_url: "https://auth.tesla.com/oauth2/v3/token".to_string(),
            client_id: "ownerapi".to_string(),
            scope: "openid email offline_access".to_string(),
            user_agent: "Mozilla/5.0 (Linux; Android 8.1.0; Pixel XL Build/OPM4.171019.021.D1; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/68.0.3440.91 Mobile Safari/537.36".to_string(),
            x_tesla_user_agent: "TeslaApp/3.4.4-350/fad4a582e/android/8.1.0".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            vehicle_id_ttl_ms: 10_000,
            wake_min_interval_ms: 5_000,
            wake_poll_interval_ms: 1_000,
            wake_poll_attempts: 20,
            conditioning_auto_stop_secs: 10 * 60,
            switch_reset_ms: 1_000,
            charging_reset_ms: 300,
            lock_update_delay_ms: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: String::new(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8089,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accessory: AccessoryConfig::default(),
            api: ApiConfig::default(),
            timings: TimingConfig::default(),
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
        }
    }
}
