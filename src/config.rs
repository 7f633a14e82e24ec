use std::time::Duration;

use tracing::error;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);
pub const UPLOAD_EXTENSION: &str = ".json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prefix of every api path, empty for the origin serving the client.
    pub api_base_url: String,
    pub refresh_interval: Duration,
    pub notification_ttl: Duration,
    pub upload_extension: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            upload_extension: UPLOAD_EXTENSION,
        }
    }
}

impl Config {
    /// Overrides baked in at build time, there is no process environment in the browser.
    pub fn from_build_env() -> Self {
        Self::from_vars(
            option_env!("FLEET_API_URL"),
            option_env!("FLEET_REFRESH_INTERVAL"),
            option_env!("FLEET_NOTIFICATION_TTL"),
        )
        .unwrap_or_else(|err| {
            error!("invalid build configuration, using defaults: {err}");
            Self::default()
        })
    }

    pub fn from_vars(
        api_url: Option<&str>,
        refresh_interval: Option<&str>,
        notification_ttl: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(api_url) = api_url {
            config.api_base_url = parse_api_url(api_url)?;
        }
        if let Some(value) = refresh_interval {
            config.refresh_interval = parse_duration("FLEET_REFRESH_INTERVAL", value)?;
        }
        if let Some(value) = notification_ttl {
            config.notification_ttl = parse_duration("FLEET_NOTIFICATION_TTL", value)?;
        }

        Ok(config)
    }
}

fn parse_api_url(value: &str) -> Result<String, ConfigError> {
    let value = value.trim().trim_end_matches('/');
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.to_string())
    } else {
        Err(ConfigError::Url(value.to_string()))
    }
}

fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::Duration { key, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        let config = Config::from_vars(None, None, None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.refresh_interval, Duration::from_secs(10));
        assert_eq!(config.api_base_url, "");
    }

    #[test]
    fn overrides_are_parsed() {
        let config =
            Config::from_vars(Some("http://localhost:5000/"), Some("30s"), Some("1500ms")).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.notification_ttl, Duration::from_millis(1500));
    }

    #[test]
    fn invalid_overrides_are_reported() {
        assert!(matches!(
            Config::from_vars(None, Some("soon"), None),
            Err(ConfigError::Duration {
                key: "FLEET_REFRESH_INTERVAL",
                ..
            })
        ));
        assert!(matches!(
            Config::from_vars(Some("localhost:5000"), None, None),
            Err(ConfigError::Url(_))
        ));
    }
}
