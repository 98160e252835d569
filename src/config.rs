//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dev server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built frontend (`index.html` + wasm bundle)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Largest request body forwarded to the backend (image uploads)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5173
}

fn default_static_dir() -> String {
    "./cardioscope-ui/dist".to_string()
}

fn default_max_body_size() -> usize {
    20 * 1024 * 1024 // 20 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Analysis backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout for native clients. Analysis can take a while.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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

    /// Load an explicit file, or search the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("cardioscope").join("config.toml")),
            Some(PathBuf::from("/etc/cardioscope/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("CARDIOSCOPE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("CARDIOSCOPE_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(dir) = var("CARDIOSCOPE_STATIC_DIR") {
            self.server.static_dir = dir;
        }

        // Backend overrides
        if let Some(url) = var("CARDIOSCOPE_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(secs) = var("CARDIOSCOPE_REQUEST_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.backend.request_timeout_secs = secs;
        }

        // Logging overrides
        if let Some(level) = var("CARDIOSCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CARDIOSCOPE_LOG_FORMAT") {
            self.logging.format = format;
        }
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

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Cardioscope Configuration
#
# Environment variables override these settings:
# - CARDIOSCOPE_HOST
# - CARDIOSCOPE_PORT
# - CARDIOSCOPE_STATIC_DIR
# - CARDIOSCOPE_BACKEND_URL
# - CARDIOSCOPE_REQUEST_TIMEOUT_SECS
# - CARDIOSCOPE_LOG_LEVEL
# - CARDIOSCOPE_LOG_FORMAT

[server]
# Dev server host
host = "0.0.0.0"

# Dev server port
port = 5173

# Built frontend served at /
static_dir = "./cardioscope-ui/dist"

# Largest request body forwarded to the backend (bytes)
max_body_size = 20971520

[backend]
# Analysis backend; /api/* is forwarded here
url = "http://localhost:8080"

# Request timeout for the CLI (seconds)
request_timeout_secs = 120

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
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.addr(), "0.0.0.0:5173");
        assert_eq!(config.backend.url, "http://localhost:8080");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.server.max_body_size, defaults.server.max_body_size);
        assert_eq!(config.backend.request_timeout_secs, defaults.backend.request_timeout_secs);
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nurl = \"http://analysis:9000\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.url, "http://analysis:9000");
        assert_eq!(config.server.port, 5173);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));

        let missing = Path::new("/definitely/not/here.toml");
        assert!(matches!(Config::load(missing), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CARDIOSCOPE_PORT", "9100"),
            ("CARDIOSCOPE_BACKEND_URL", "http://backend:8080"),
            ("CARDIOSCOPE_REQUEST_TIMEOUT_SECS", "not-a-number"),
            ("CARDIOSCOPE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.backend.url, "http://backend:8080");
        assert_eq!(config.backend.request_timeout_secs, 120);
        assert_eq!(config.logging.format, "json");
    }
}
