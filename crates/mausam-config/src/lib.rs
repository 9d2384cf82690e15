use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// `mysql://...` or `memory://`
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenWeather,
    Simulator,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    pub kind: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PollerConfig {
    pub interval_secs: Option<u64>,
    pub fetch_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub poller: PollerConfig,
}

/// Where readings and thresholds live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    MySql(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl AppConfig {
    /// Load from MAUSAM_CONFIG path (TOML) if present, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MAUSAM_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = Self::load_file(&path)?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Parse a TOML file, or defaults if it does not exist
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str::<AppConfig>(&s)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENWEATHERMAP_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = Some(port.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("not a port number: {port}"),
            })?);
        }
        if let Some(secs) = lookup("POLL_INTERVAL") {
            self.poller.interval_secs = Some(secs.parse().map_err(|_| ConfigError::Invalid {
                name: "POLL_INTERVAL",
                reason: format!("not a number of seconds: {secs}"),
            })?);
        }
        if let Some(kind) = lookup("WEATHER_SOURCE") {
            self.provider.kind = Some(match kind.as_str() {
                "openweather" => ProviderKind::OpenWeather,
                "simulator" => ProviderKind::Simulator,
                other => {
                    return Err(ConfigError::Invalid {
                        name: "WEATHER_SOURCE",
                        reason: format!("unknown source: {other}"),
                    })
                }
            });
        }
        Ok(())
    }

    /// Check that everything required at startup is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store_kind()?;
        if self.provider_kind() == ProviderKind::OpenWeather && self.api_key().is_none() {
            return Err(ConfigError::Missing("OPENWEATHERMAP_API_KEY"));
        }
        if self.poll_interval_secs() == 0 {
            return Err(ConfigError::Invalid {
                name: "poller.interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Url::parse(&self.provider_base_url()).map_err(|e| ConfigError::Invalid {
            name: "provider.base_url",
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// HTTP bind address (default 0.0.0.0:5000)
    pub fn http_bind(&self) -> String {
        let host = self.server.host.as_deref().unwrap_or("0.0.0.0");
        let port = self.server.port.unwrap_or(DEFAULT_PORT);
        format!("{host}:{port}")
    }

    pub fn store_kind(&self) -> Result<StoreKind, ConfigError> {
        let raw = self
            .database
            .url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
            name: "DATABASE_URL",
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "memory" => Ok(StoreKind::Memory),
            "mysql" => Ok(StoreKind::MySql(raw.to_string())),
            other => Err(ConfigError::Invalid {
                name: "DATABASE_URL",
                reason: format!("unsupported scheme: {other}"),
            }),
        }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind.unwrap_or_default()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn provider_base_url(&self) -> String {
        self.provider
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string())
    }

    pub fn provider_timeout_secs(&self) -> u64 {
        self.provider
            .timeout_secs
            .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS)
    }

    pub fn poll_interval_secs(&self) -> u64 {
        self.poller
            .interval_secs
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    pub fn fetch_timeout_secs(&self) -> u64 {
        self.poller
            .fetch_timeout_secs
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
    }
}
