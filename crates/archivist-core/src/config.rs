//! Configuration management for the archivist client.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Base origin of the archive. All relative request paths resolve against it.
pub const ARCHIVE_URL: &str = "https://archiveofourown.org";

/// Main client configuration.
///
/// This is loaded from `~/.config/archivist/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Transport settings
    pub network: NetworkConfig,
    /// Request throttling settings
    pub throttle: ThrottleConfig,
}

impl ClientConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `ARCHIVIST_BASE_URL`: Override the base origin
    /// - `ARCHIVIST_THROTTLE_MS`: Override the minimum interval between requests
    /// - `ARCHIVIST_USER_AGENT`: Override the user agent string
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        // Override from environment
        if let Ok(val) = std::env::var("ARCHIVIST_BASE_URL") {
            if !val.is_empty() {
                tracing::debug!("Override base_url from env: {}", val);
                config.network.base_url = val;
            }
        }

        if let Ok(val) = std::env::var("ARCHIVIST_THROTTLE_MS") {
            if let Ok(interval) = val.parse() {
                tracing::debug!("Override throttle interval from env: {}", interval);
                config.throttle.interval_ms = interval;
            }
        }

        if let Ok(val) = std::env::var("ARCHIVIST_USER_AGENT") {
            if !val.is_empty() {
                config.network.user_agent = val;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/archivist/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("rs", "archivist", "archivist").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Check the configuration for values the client cannot operate with.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for an empty base URL, a base
    /// URL without an `http(s)` scheme, or a zero request timeout.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.network.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "network.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !self.network.base_url.starts_with("http://")
            && !self.network.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "network.base_url".to_string(),
                reason: format!("must be an http(s) origin, got '{}'", self.network.base_url),
            });
        }
        if self.network.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base origin requests resolve against
    pub base_url: String,
    /// User agent string sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Bind the transport to IPv4 only. The archive has no IPv6 endpoint,
    /// so dual-stack connection attempts only add latency.
    pub ipv4_only: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: format!("{ARCHIVE_URL}/"),
            // A mainstream desktop browser identity keeps the anti-bot layer quiet.
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
            ipv4_only: true,
        }
    }
}

/// Request throttling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Minimum wall-clock interval between requests on one lane, in milliseconds
    pub interval_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.network.base_url, "https://archiveofourown.org/");
        assert_eq!(config.network.timeout_secs, 30);
        assert!(config.network.ipv4_only);
        assert_eq!(config.throttle.interval_ms, 1000);
        config.validate().expect("default config is valid");
    }

    #[test]
    fn test_config_serialization() {
        let config = ClientConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[network]"));
        assert!(toml_str.contains("[throttle]"));

        let parsed: ClientConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.network.base_url, config.network.base_url);
        assert_eq!(parsed.throttle.interval_ms, config.throttle.interval_ms);
    }

    #[test]
    fn test_config_save_load_round_trip() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = ClientConfig::default();
        config.throttle.interval_ms = 2500;
        config.network.timeout_secs = 10;

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded: ClientConfig = toml::from_str(&loaded_contents).expect("parse loaded config");

        assert_eq!(loaded.throttle.interval_ms, 2500);
        assert_eq!(loaded.network.timeout_secs, 10);
    }

    #[test]
    fn test_partial_config() {
        // Partial TOML configs fill the rest with defaults
        let toml_str = r#"
[throttle]
interval_ms = 1500
"#;

        let config: ClientConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.throttle.interval_ms, 1500);
        assert_eq!(config.network.base_url, "https://archiveofourown.org/");
        assert!(config.network.ipv4_only);
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = ClientConfig::default();
        config.network.base_url = "archiveofourown.org".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        config.network.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("ARCHIVIST_THROTTLE_MS", "250");

        // Can't call load_with_env directly since it reads the real config
        // path, but the override logic is the same
        let mut config = ClientConfig::default();
        if let Ok(val) = std::env::var("ARCHIVIST_THROTTLE_MS") {
            if let Ok(interval) = val.parse() {
                config.throttle.interval_ms = interval;
            }
        }
        assert_eq!(config.throttle.interval_ms, 250);

        std::env::remove_var("ARCHIVIST_THROTTLE_MS");
    }
}
