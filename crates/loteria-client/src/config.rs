//! # Client Configuration
//!
//! Where the API lives, how long to wait for it, and how verbose to be.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LOTERIA_API_BASE_URL=https://api.loteria360.com/api/v1             │
//! │     LOTERIA_API_TIMEOUT_MS=15000                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/loteria360/config.toml (Linux)                           │
//! │     ~/Library/Application Support/com.loteria360.loteria360/… (macOS) │
//! │                                                                         │
//! │  3. Environment Preset (lowest priority)                               │
//! │     development | local-network | production                           │
//! │     chosen by LOTERIA_ENV, else `environment` in the file              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! environment = "production"
//! api_base_url = "https://api.loteria360.com/api/v1"
//! api_timeout_ms = 15000
//! debug = false
//! log_level = "error"
//! token_storage_key = "loteria360_token"
//! user_storage_key = "loteria360_user"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Environment
// =============================================================================

/// Deployment preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    /// Back-end on the developer machine.
    #[default]
    Development,

    /// Back-end on another machine of the shop's LAN.
    LocalNetwork,

    /// Hosted back-end.
    Production,
}

impl Environment {
    /// Preset values for this environment.
    pub fn preset(&self) -> ClientConfig {
        let (base_url, timeout_ms, debug, log_level) = match self {
            Environment::Development => ("http://localhost:8080/api/v1", 10_000, true, LogLevel::Debug),
            Environment::LocalNetwork => ("http://192.168.0.57:8080/api/v1", 10_000, true, LogLevel::Debug),
            Environment::Production => ("https://api.loteria360.com/api/v1", 15_000, false, LogLevel::Error),
        };

        ClientConfig {
            environment: *self,
            api_base_url: base_url.to_string(),
            api_timeout_ms: timeout_ms,
            debug,
            log_level,
            token_storage_key: default_token_key(),
            user_storage_key: default_user_key(),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::LocalNetwork => write!(f, "local-network"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "local-network" | "local" | "lan" => Ok(Environment::LocalNetwork),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown environment: '{}'. Valid options: development, local-network, production",
                other
            ))),
        }
    }
}

// =============================================================================
// Log Level
// =============================================================================

/// Verbosity of the client's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown log level: '{}'. Valid options: debug, info, warn, error",
                other
            ))),
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

fn default_token_key() -> String {
    "loteria360_token".to_string()
}

fn default_user_key() -> String {
    "loteria360_user".to_string()
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Preset these values started from.
    pub environment: Environment,

    /// Base URL of the REST API, including the `/api/v1` prefix.
    pub api_base_url: String,

    /// Request timeout (milliseconds).
    pub api_timeout_ms: u64,

    /// Debug mode; debug-level logs are only emitted when set.
    pub debug: bool,

    pub log_level: LogLevel,

    /// Storage key of the bearer token.
    pub token_storage_key: String,

    /// Storage key of the logged-in user (JSON).
    pub user_storage_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Environment::Development.preset()
    }
}

/// The config file: every key optional, layered over the preset.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    environment: Option<Environment>,
    api_base_url: Option<String>,
    api_timeout_ms: Option<u64>,
    debug: Option<bool>,
    log_level: Option<LogLevel>,
    token_storage_key: Option<String>,
    user_storage_key: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and presets.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Preset of `LOTERIA_ENV` (or the file's `environment`)
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut file = ConfigFile::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                file = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using preset");
            }
        }

        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Parses a TOML document and layers `lookup` over it.
    ///
    /// `lookup` stands in for the process environment.
    pub fn from_toml_str<F>(contents: &str, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_sources(toml::from_str(contents)?, lookup)
    }

    fn from_sources<F>(file: ConfigFile, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("LOTERIA_ENV") {
            Some(name) => name.parse()?,
            None => file.environment.unwrap_or_default(),
        };

        let mut config = environment.preset();
        config.apply_file(file);
        config.apply_env_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = url::Url::parse(&self.api_base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("Invalid API URL '{}': {}", self.api_base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api_base_url
            )));
        }

        if self.api_timeout_ms == 0 {
            return Err(ClientError::InvalidConfig(
                "api_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.token_storage_key.is_empty() || self.user_storage_key.is_empty() {
            return Err(ClientError::InvalidConfig("storage keys must not be empty".into()));
        }
        if self.token_storage_key == self.user_storage_key {
            return Err(ClientError::InvalidConfig(
                "token and user storage keys must differ".into(),
            ));
        }

        Ok(())
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if let Some(timeout) = file.api_timeout_ms {
            self.api_timeout_ms = timeout;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        if let Some(key) = file.token_storage_key {
            self.token_storage_key = key;
        }
        if let Some(key) = file.user_storage_key {
            self.user_storage_key = key;
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LOTERIA_API_BASE_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api_base_url = url;
        }

        if let Some(timeout) = lookup("LOTERIA_API_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => self.api_timeout_ms = ms,
                Err(_) => warn!(value = %timeout, "Ignoring invalid LOTERIA_API_TIMEOUT_MS"),
            }
        }

        if let Some(flag) = lookup("LOTERIA_DEBUG") {
            self.debug = flag.eq_ignore_ascii_case("true") || flag == "1";
        }

        if let Some(level) = lookup("LOTERIA_LOG_LEVEL") {
            match level.parse() {
                Ok(parsed) => self.log_level = parsed,
                Err(_) => warn!(level = %level, "Unknown log level in environment"),
            }
        }

        if let Some(key) = lookup("LOTERIA_TOKEN_KEY") {
            self.token_storage_key = key;
        }

        if let Some(key) = lookup("LOTERIA_USER_KEY") {
            self.user_storage_key = key;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "loteria360", "loteria360")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Request timeout.
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    /// Level actually used for logging: debug output needs `debug = true`.
    pub fn effective_log_level(&self) -> LogLevel {
        if self.log_level == LogLevel::Debug && !self.debug {
            LogLevel::Info
        } else {
            self.log_level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("LAN".parse::<Environment>().unwrap(), Environment::LocalNetwork);
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_presets() {
        let dev = ClientConfig::default();
        assert_eq!(dev.api_base_url, "http://localhost:8080/api/v1");
        assert_eq!(dev.api_timeout(), Duration::from_secs(10));
        assert!(dev.debug);
        assert_eq!(dev.token_storage_key, "loteria360_token");
        assert_eq!(dev.user_storage_key, "loteria360_user");

        let prod = Environment::Production.preset();
        assert_eq!(prod.api_base_url, "https://api.loteria360.com/api/v1");
        assert_eq!(prod.api_timeout_ms, 15_000);
        assert_eq!(prod.log_level, LogLevel::Error);

        let lan = Environment::LocalNetwork.preset();
        assert_eq!(lan.api_base_url, "http://192.168.0.57:8080/api/v1");

        for preset in [dev, prod, lan] {
            assert!(preset.validate().is_ok());
        }
    }

    #[test]
    fn test_file_over_preset() {
        let config = ClientConfig::from_toml_str(
            r#"
            environment = "production"
            api_timeout_ms = 20000
            "#,
            env(&[]),
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_base_url, "https://api.loteria360.com/api/v1");
        assert_eq!(config.api_timeout_ms, 20_000);
        assert!(!config.debug);
    }

    #[test]
    fn test_env_over_file() {
        let config = ClientConfig::from_toml_str(
            r#"api_base_url = "http://10.0.0.2:8080/api/v1""#,
            env(&[
                ("LOTERIA_ENV", "production"),
                ("LOTERIA_API_BASE_URL", "https://staging.loteria360.com/api/v1"),
                ("LOTERIA_API_TIMEOUT_MS", "5000"),
                ("LOTERIA_DEBUG", "true"),
                ("LOTERIA_LOG_LEVEL", "warn"),
                ("LOTERIA_TOKEN_KEY", "tok"),
            ]),
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_base_url, "https://staging.loteria360.com/api/v1");
        assert_eq!(config.api_timeout_ms, 5000);
        assert!(config.debug);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.token_storage_key, "tok");
        assert_eq!(config.user_storage_key, "loteria360_user");
    }

    #[test]
    fn test_invalid_env_values() {
        // A malformed timeout is ignored, an unknown environment is an error
        let config = ClientConfig::from_toml_str("", env(&[("LOTERIA_API_TIMEOUT_MS", "soon")])).unwrap();
        assert_eq!(config.api_timeout_ms, 10_000);

        assert!(ClientConfig::from_toml_str("", env(&[("LOTERIA_ENV", "qa")])).is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();
        assert!(config.validate().is_ok());

        config.api_base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api_base_url = "ftp://files.loteria360.com".to_string();
        assert!(config.validate().is_err());

        config.api_base_url = "https://api.loteria360.com/api/v1".to_string();
        config.api_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.api_timeout_ms = 1000;
        config.user_storage_key = config.token_storage_key.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_log_level() {
        let mut config = ClientConfig::default();
        assert_eq!(config.effective_log_level(), LogLevel::Debug);
        config.debug = false;
        assert_eq!(config.effective_log_level(), LogLevel::Info);
        config.log_level = LogLevel::Error;
        assert_eq!(config.effective_log_level(), LogLevel::Error);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Environment::Production.preset();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("environment = \"production\""));
        let parsed = ClientConfig::from_toml_str(&text, env(&[])).unwrap();
        assert_eq!(parsed, config);
    }
}
