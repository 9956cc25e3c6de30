//! Runtime settings read from environment variables.
//!
//! `AppConfig` picks the GitHub endpoint, bounds each request and sizes the rendered
//! chart. Variables may come from a `.env` file loaded by the binary. Every setting has a
//! default, so an empty environment is a valid configuration.

use serde::Deserialize;
use std::time::Duration as StdDuration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_url")]
    pub github_api_url: String,

    /// Upper bound on each HTTP call to GitHub, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Width of the rendered chart in pixels.
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    /// Height of the rendered chart in pixels.
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_chart_width() -> u32 {
    1000
}

fn default_chart_height() -> u32 {
    800
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_api_url: default_api_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 4] = [
        "GITHUB_API_URL",
        "REQUEST_TIMEOUT_SECONDS",
        "CHART_WIDTH",
        "CHART_HEIGHT",
    ];

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("GITHUB_API_URL", "http://localhost:9000");
        env::set_var("REQUEST_TIMEOUT_SECONDS", "5");
        env::set_var("CHART_WIDTH", "640");
        env::set_var("CHART_HEIGHT", "480");

        let config = AppConfig::from_env().expect("Failed to load config");

        assert_eq!(config.github_api_url, "http://localhost:9000");
        assert_eq!(config.request_timeout(), StdDuration::from_secs(5));
        assert_eq!(config.chart_width, 640);
        assert_eq!(config.chart_height, 480);

        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = AppConfig::from_env().expect("Failed to load config");

        assert_eq!(config.github_api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!((config.chart_width, config.chart_height), (1000, 800));
    }

    #[test]
    #[serial]
    fn test_config_invalid_number() {
        env::set_var("CHART_WIDTH", "wide");
        let result = AppConfig::from_env();
        env::remove_var("CHART_WIDTH");
        assert!(result.is_err());
    }
}
