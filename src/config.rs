//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input file locations
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_housing_path")]
    pub housing_path: String,

    #[serde(default = "default_mortgage_path")]
    pub mortgage_path: String,

    #[serde(default = "default_rents_path")]
    pub rents_path: String,
}

fn default_housing_path() -> String {
    "df_merged.csv".to_string()
}

fn default_mortgage_path() -> String {
    "df_mortgage_rates.csv".to_string()
}

fn default_rents_path() -> String {
    "rents_payments.csv".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            housing_path: default_housing_path(),
            mortgage_path: default_mortgage_path(),
            rents_path: default_rents_path(),
        }
    }
}

/// Memoization policy
///
/// The housing table is always memoized. The mortgage and rent tables are
/// re-read on every render unless `memoize_auxiliary` is set.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default)]
    pub memoize_auxiliary: bool,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            Some(PathBuf::from("./housing.toml")),
            dirs::config_dir().map(|p| p.join("housing-dashboard").join("config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Load an explicitly requested file, or fall back to the default search
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Data overrides
        if let Some(path) = lookup("HOUSING_HOUSING_PATH") {
            self.data.housing_path = path;
        }
        if let Some(path) = lookup("HOUSING_MORTGAGE_PATH") {
            self.data.mortgage_path = path;
        }
        if let Some(path) = lookup("HOUSING_RENTS_PATH") {
            self.data.rents_path = path;
        }

        // Cache overrides
        if let Some(flag) = lookup("HOUSING_MEMOIZE_AUXILIARY") {
            if let Some(memoize) = parse_flag(&flag) {
                self.cache.memoize_auxiliary = memoize;
            }
        }

        // API overrides
        if let Some(host) = lookup("HOUSING_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("HOUSING_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("HOUSING_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("HOUSING_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// `true`/`false` in any case, or `1`/`0`; anything else is rejected
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" => Some(true),
        "0" => Some(false),
        other => other.to_ascii_lowercase().parse().ok(),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so command output on stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "housing_dashboard={},tower_http={}",
            config.level, config.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# US Housing Dashboard Configuration
#
# Environment variables override these settings:
# - HOUSING_HOUSING_PATH
# - HOUSING_MORTGAGE_PATH
# - HOUSING_RENTS_PATH
# - HOUSING_MEMOIZE_AUXILIARY
# - HOUSING_API_HOST
# - HOUSING_API_PORT
# - HOUSING_LOG_LEVEL
# - HOUSING_LOG_FORMAT

[data]
# Primary dataset: state, date, property type, average price
housing_path = "df_merged.csv"

# Mortgage payments by state (choropleth)
mortgage_path = "df_mortgage_rates.csv"

# Monthly payment vs. average rent over time
rents_path = "rents_payments.csv"

[cache]
# The housing dataset is always cached until its file changes.
# Set to true to cache the mortgage and rent files the same way
# instead of re-reading them on every render.
memoize_auxiliary = false

[api]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 8501

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_round_trips() {
        let config = Config::parse(&generate_default_config(), Path::new("default.toml")).unwrap();
        assert_eq!(config.data, DataConfig::default());
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[data]
housing_path = "/srv/housing.csv"

[cache]
memoize_auxiliary = true
"#;
        let config = Config::parse(toml, Path::new("partial.toml")).unwrap();
        assert_eq!(config.data.housing_path, "/srv/housing.csv");
        assert_eq!(config.data.rents_path, "rents_payments.csv");
        assert!(config.cache.memoize_auxiliary);
        assert_eq!(config.api.port, 8501);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[api]\nport = \"high\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/no/such/housing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HOUSING_HOUSING_PATH", "h.csv"),
            ("HOUSING_MEMOIZE_AUXILIARY", "1"),
            ("HOUSING_API_PORT", "9000"),
            ("HOUSING_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.data.housing_path, "h.csv");
        assert!(config.cache.memoize_auxiliary);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "HOUSING_API_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.api.port, 8501);
    }

    #[test]
    fn test_memoize_override_accepts_only_booleans() {
        for (value, expected) in [("true", true), ("TRUE", true), ("1", true), ("false", false), ("0", false)] {
            let mut config = Config::default();
            config.cache.memoize_auxiliary = !expected;
            config.apply_overrides(|k| (k == "HOUSING_MEMOIZE_AUXILIARY").then(|| value.to_string()));
            assert_eq!(config.cache.memoize_auxiliary, expected, "value {:?}", value);
        }

        for value in ["off", "no", "yes", ""] {
            let mut config = Config::default();
            config.apply_overrides(|k| (k == "HOUSING_MEMOIZE_AUXILIARY").then(|| value.to_string()));
            assert!(!config.cache.memoize_auxiliary, "value {:?}", value);
        }
    }

    #[test]
    fn test_api_addr() {
        assert_eq!(ApiConfig::new("127.0.0.1", 8080).addr(), "127.0.0.1:8080");
    }
}
