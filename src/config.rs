// Configuration File Support
//
// Configuration for the translation access core. Supports TOML format
// with environment variable overrides, loaded from the XDG config
// directory: ~/.config/linguaguard/config.toml
//
// The cache signing secret is deliberately not part of the file format;
// it comes from the environment or is supplied programmatically.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rate_limit::RateLimitTable;

/// Environment variable holding the cache signing secret
pub const SECRET_ENV_VAR: &str = "LINGUAGUARD_CACHE_SECRET";

/// Minimum accepted signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Per-operation-kind rate limits
    pub rate_limits: RateLimitTable,

    /// Cache configuration
    pub cache: CacheSettings,

    /// Policy configuration
    pub policy: PolicySettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
    /// Entry lifetime in seconds
    pub ttl_secs: u64,

    /// Maximum number of stored entries
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: crate::cache::DEFAULT_TTL_SECS,
            max_entries: crate::cache::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheSettings {
    /// Entry lifetime as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicySettings {
    /// Allow-list of trusted custom decision module names
    pub trusted_deciders: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            rate_limits: RateLimitTable::default(),
            cache: CacheSettings::default(),
            policy: PolicySettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default XDG config directory
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    /// If the config file does not exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed
    /// or fails validation. If the config file does not exist, returns
    /// default configuration.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file from {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file from {:?}", path))?;

        let config = config.apply_env_overrides();
        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/linguaguard/config.toml` on Linux/Mac
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "linguaguard", "LinguaGuard")
        {
            proj_dirs.config_dir().join("config.toml")
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join(".config")
                .join("linguaguard")
                .join("config.toml")
        }
    }

    /// Read the cache signing secret from the environment
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is unset or shorter than
    /// `MIN_SECRET_LEN` bytes.
    pub fn signing_secret() -> Result<SecretString> {
        let secret = std::env::var(SECRET_ENV_VAR)
            .with_context(|| format!("{SECRET_ENV_VAR} is not set"))?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("{SECRET_ENV_VAR} must be at least {MIN_SECRET_LEN} bytes");
        }
        Ok(SecretString::from(secret))
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Environment variables take precedence over config file values:
    /// - LINGUAGUARD_LOG_LEVEL
    /// - LINGUAGUARD_LOG_FORMAT
    /// - LINGUAGUARD_CACHE_TTL_SECS
    /// - LINGUAGUARD_CACHE_MAX_ENTRIES
    fn apply_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("LINGUAGUARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LINGUAGUARD_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Ok(ttl) = std::env::var("LINGUAGUARD_CACHE_TTL_SECS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                if ttl > 0 {
                    self.cache.ttl_secs = ttl;
                }
            }
        }
        if let Ok(max) = std::env::var("LINGUAGUARD_CACHE_MAX_ENTRIES") {
            if let Ok(max) = max.parse::<usize>() {
                if max > 0 && max <= 1_000_000 {
                    self.cache.max_entries = max;
                }
            }
        }

        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            ),
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!(
                "Invalid log format: {}. Must be one of: json, pretty, compact",
                self.logging.format
            ),
        }

        self.rate_limits.validate()?;

        if self.cache.ttl_secs == 0 {
            anyhow::bail!("Cache TTL must be > 0 seconds");
        }
        if self.cache.max_entries == 0 {
            anyhow::bail!("Cache max entries must be > 0");
        }
        if self.cache.max_entries > 1_000_000 {
            anyhow::bail!("Cache max entries must be <= 1000000");
        }

        for name in &self.policy.trusted_deciders {
            if name.is_empty() || name.len() > 64 {
                anyhow::bail!("Trusted decider name '{}' must be 1-64 bytes", name);
            }
        }

        Ok(())
    }

    /// Convert log level string to tracing::Level
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse log level: {}", e))
    }

    /// Install the global tracing subscriber per the logging section
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init_tracing(&self) -> Result<()> {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(self.logging.level.clone()));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);

        match self.logging.format.to_lowercase().as_str() {
            "json" => builder.json().try_init(),
            "pretty" => builder.pretty().try_init(),
            _ => builder.compact().try_init(),
        }
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::OperationKind;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.max_entries, 10_000);
        assert!(config.policy.trusted_deciders.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_cache_ttl() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_oversized_cache() {
        let mut config = Config::default();
        config.cache.max_entries = 2_000_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_decider_name() {
        let mut config = Config::default();
        config.policy.trusted_deciders = vec![String::new()];
        assert!(config.validate().is_err());

        config.policy.trusted_deciders = vec!["a".repeat(65)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_nonexistent_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().with_extension(".nonexistent");
        let config = Config::load_from_path(&path);
        assert!(config.is_ok());
        assert_eq!(config.unwrap(), Config::default());
    }

    #[test]
    fn test_load_valid_toml_config() {
        std::env::remove_var("LINGUAGUARD_LOG_LEVEL");
        std::env::remove_var("LINGUAGUARD_LOG_FORMAT");
        std::env::remove_var("LINGUAGUARD_CACHE_TTL_SECS");
        std::env::remove_var("LINGUAGUARD_CACHE_MAX_ENTRIES");

        let temp_file = NamedTempFile::new().unwrap();
        let toml_content = r#"
[logging]
level = "debug"
format = "json"

[rate_limits.read]
capacity = 500
window_secs = 60

[cache]
ttl_secs = 1800
max_entries = 5000

[policy]
trusted_deciders = ["compliance_review"]
"#;

        fs::write(temp_file.path(), toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.rate_limits.quota(OperationKind::Read).capacity, 500);
        assert_eq!(config.cache.ttl_secs, 1800);
        assert_eq!(config.cache.max_entries, 5000);
        assert_eq!(config.policy.trusted_deciders, vec!["compliance_review"]);
    }

    #[test]
    fn test_load_invalid_toml_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let toml_content = r#"
[logging
level = "debug"
"#; // Invalid TOML

        fs::write(temp_file.path(), toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path());
        assert!(config.is_err());
    }

    #[test]
    fn test_config_partial_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        let toml_content = r#"
[cache]
ttl_secs = 600
"#;

        fs::write(temp_file.path(), toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.cache.ttl_secs, 600);
        // Other fields keep defaults.
        assert_eq!(config.cache.max_entries, 10_000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_overrides() {
        std::env::remove_var("LINGUAGUARD_LOG_LEVEL");
        std::env::remove_var("LINGUAGUARD_CACHE_TTL_SECS");

        std::env::set_var("LINGUAGUARD_LOG_LEVEL", "debug");
        std::env::set_var("LINGUAGUARD_CACHE_TTL_SECS", "120");

        let config = Config::default().apply_env_overrides();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.cache.ttl_secs, 120);

        std::env::remove_var("LINGUAGUARD_LOG_LEVEL");
        std::env::remove_var("LINGUAGUARD_CACHE_TTL_SECS");
    }

    #[test]
    fn test_env_overrides_invalid_values() {
        std::env::remove_var("LINGUAGUARD_CACHE_TTL_SECS");
        std::env::remove_var("LINGUAGUARD_CACHE_MAX_ENTRIES");

        std::env::set_var("LINGUAGUARD_CACHE_TTL_SECS", "0");
        std::env::set_var("LINGUAGUARD_CACHE_MAX_ENTRIES", "notanumber");

        let config = Config::default().apply_env_overrides();
        // Invalid values keep defaults.
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.cache.max_entries, 10_000);

        std::env::remove_var("LINGUAGUARD_CACHE_TTL_SECS");
        std::env::remove_var("LINGUAGUARD_CACHE_MAX_ENTRIES");
    }

    #[test]
    fn test_signing_secret_from_env() {
        std::env::set_var(SECRET_ENV_VAR, "0123456789abcdef0123456789abcdef");
        assert!(Config::signing_secret().is_ok());

        std::env::set_var(SECRET_ENV_VAR, "too-short");
        assert!(Config::signing_secret().is_err());

        std::env::remove_var(SECRET_ENV_VAR);
        assert!(Config::signing_secret().is_err());
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = Config::default();
        config.logging.level = "debug".to_string();
        assert_eq!(config.log_level().unwrap(), tracing::Level::DEBUG);

        config.logging.level = "invalid".to_string();
        assert!(config.log_level().is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config, parsed);
    }
}
