//! Relay configuration.
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`)
//! 3. `APPLIQUE_RELAY_*` environment variables
//! 4. command-line flags
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! allowed_origin = "http://localhost:5173"
//!
//! [backend]
//! query_url = "http://localhost:5001/query"
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const ENV_HOST: &str = "APPLIQUE_RELAY_HOST";
pub const ENV_PORT: &str = "APPLIQUE_RELAY_PORT";
pub const ENV_ALLOWED_ORIGIN: &str = "APPLIQUE_RELAY_ALLOWED_ORIGIN";
pub const ENV_BACKEND_URL: &str = "APPLIQUE_RELAY_BACKEND_URL";
pub const ENV_BACKEND_TIMEOUT_SECS: &str = "APPLIQUE_RELAY_BACKEND_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "APPLIQUE_RELAY_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "APPLIQUE_RELAY_LOG_FORMAT";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub server: ServerSection,
    pub backend: BackendSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// The single browser origin allowed to reach the SSE routes
    pub allowed_origin: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSection {
    pub query_url: String,
    /// Request timeout; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            query_url: "http://localhost:5001/query".to_string(),
            timeout_secs: None,
        }
    }
}

impl BackendSection {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected 'text' or 'json'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub allowed_origin: Option<String>,
    pub backend_url: Option<String>,
    pub log_level: Option<String>,
}

impl RelayConfig {
    /// Defaults, then the optional file, then the process environment.
    ///
    /// The result is validated before it is returned.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn merge_env_vars(&mut self) -> Result<(), ConfigError> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `APPLIQUE_RELAY_*` overrides read through `lookup`.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            debug!("Overriding server host from environment: {}", host);
            self.server.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(ENV_PORT, format!("'{port}': {e}")))?;
            debug!("Overriding server port from environment: {}", self.server.port);
        }

        if let Some(origin) = lookup(ENV_ALLOWED_ORIGIN) {
            debug!("Overriding allowed origin from environment: {}", origin);
            self.server.allowed_origin = origin;
        }

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            debug!("Overriding backend URL from environment: {}", url);
            self.backend.query_url = url;
        }

        if let Some(timeout) = lookup(ENV_BACKEND_TIMEOUT_SECS) {
            let secs = timeout.trim().parse::<u64>().map_err(|e| {
                ConfigError::invalid(ENV_BACKEND_TIMEOUT_SECS, format!("'{timeout}': {e}"))
            })?;
            debug!("Overriding backend timeout from environment: {}s", secs);
            self.backend.timeout_secs = Some(secs);
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = format
                .parse()
                .map_err(|reason| ConfigError::invalid(ENV_LOG_FORMAT, reason))?;
        }

        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(origin) = overrides.allowed_origin {
            self.server.allowed_origin = origin;
        }
        if let Some(url) = overrides.backend_url {
            self.backend.query_url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be empty"));
        }

        let origin = &self.server.allowed_origin;
        if HeaderValue::from_str(origin).is_err() {
            return Err(ConfigError::invalid(
                "server.allowed_origin",
                format!("'{origin}' is not a valid header value"),
            ));
        }
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "server.allowed_origin",
                format!("'{origin}' must start with http:// or https://"),
            ));
        }

        self.backend_url()?;

        if self.backend.timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "backend.timeout_secs",
                "must be greater than 0",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!(
                    "'{}' must be one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// The backend endpoint as a parsed http(s) URL.
    pub fn backend_url(&self) -> Result<Url, ConfigError> {
        let raw = &self.backend.query_url;
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::invalid("backend.query_url", format!("'{raw}': {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::invalid(
                "backend.query_url",
                format!("unsupported scheme '{scheme}'"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.allowed_origin, "http://localhost:5173");
        assert_eq!(config.backend.query_url, "http://localhost:5001/query");
        assert!(config.backend.timeout().is_none());
        assert_eq!(config.logging.format, LogFormat::Text);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nquery_url = \"http://rag.internal:8080/query\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = RelayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend.query_url, "http://rag.internal:8080/query");
        assert_eq!(config.backend.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nprot = 3001").unwrap();

        let result = RelayConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = RelayConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config: RelayConfig = toml::from_str("[server]\nport = 4000").unwrap();
        config
            .merge_env_from(env(&[
                (ENV_PORT, "4100"),
                (ENV_BACKEND_URL, "https://rag.example/query"),
                (ENV_BACKEND_TIMEOUT_SECS, "12"),
                (ENV_LOG_FORMAT, "JSON"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(config.backend.query_url, "https://rag.example/query");
        assert_eq!(config.backend.timeout_secs, Some(12));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_bad_env_values() {
        let mut config = RelayConfig::default();
        let result = config.merge_env_from(env(&[(ENV_PORT, "seventy")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: ENV_PORT, .. })));

        let result = config.merge_env_from(env(&[(ENV_LOG_FORMAT, "xml")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: ENV_LOG_FORMAT, .. })));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = RelayConfig::default();
        config
            .merge_env_from(env(&[(ENV_BACKEND_URL, "http://from-env/query")]))
            .unwrap();
        config.apply_overrides(ConfigOverrides {
            backend_url: Some("http://from-cli/query".to_string()),
            port: Some(3999),
            ..Default::default()
        });

        assert_eq!(config.backend.query_url, "http://from-cli/query");
        assert_eq!(config.server.port, 3999);
    }

    #[test]
    fn test_validation() {
        let mut config = RelayConfig::default();
        config.backend.query_url = "ftp://files/query".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "backend.query_url", .. })
        ));

        let mut config = RelayConfig::default();
        config.server.allowed_origin = "localhost:5173".to_string();
        assert!(config.validate().is_err());

        let mut config = RelayConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = RelayConfig::default();
        config.backend.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
