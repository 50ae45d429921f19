//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file and then overlaid with
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::{Error, Result};
use crate::validation::{validate_non_empty, validate_positive};

/// Environment variable overriding [`BackendConfig::base_url`].
pub const ENV_BASE_URL: &str = "PM_TOOLS_BASE_URL";
/// Environment variable overriding [`BackendConfig::timeout`] (humantime, e.g. `30s`).
pub const ENV_TIMEOUT: &str = "PM_TOOLS_TIMEOUT";
/// Environment variable overriding [`ToolsConfig::catalog_path`].
pub const ENV_CATALOG: &str = "PM_TOOLS_CATALOG";

/// Upper bound accepted for [`HostConfig::max_line_bytes`].
pub const MAX_LINE_BYTES_LIMIT: usize = 256 * 1024 * 1024;

/// Global adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Tool catalog sources.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Stdio host settings.
    #[serde(default)]
    pub host: HostConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing sections take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Overlay environment variables onto this configuration.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.backend.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            self.backend.timeout = parse_duration(&raw)
                .map_err(|e| Error::config(format!("{ENV_TIMEOUT}: {e}")))?;
        }
        if let Some(path) = lookup(ENV_CATALOG) {
            self.tools.catalog_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Reject settings the adapter cannot start with.
    pub fn validate(&self) -> Result<()> {
        validate_non_empty(&self.backend.base_url, "backend.base_url")?;
        if self.backend.timeout.is_zero() {
            return Err(Error::config("backend.timeout must be positive"));
        }
        validate_positive(self.host.max_line_bytes, "host.max_line_bytes")?;
        if self.host.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(Error::config(format!(
                "host.max_line_bytes must be at most {}",
                MAX_LINE_BYTES_LIMIT
            )));
        }
        validate_positive(self.host.max_concurrent_calls, "host.max_concurrent_calls")?;
        validate_positive(
            self.host.response_channel_capacity,
            "host.response_channel_capacity",
        )?;
        if !self.tools.include_builtin && self.tools.catalog_path.is_none() {
            return Err(Error::config(
                "no tools configured: enable tools.include_builtin or set tools.catalog_path",
            ));
        }
        Ok(())
    }
}

fn parse_duration(raw: &str) -> std::result::Result<Duration, serde_json::Error> {
    #[derive(Deserialize)]
    struct Humantime(#[serde(with = "humantime_serde")] Duration);

    serde_json::from_value::<Humantime>(serde_json::Value::String(raw.to_string()))
        .map(|h| h.0)
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Scheme + host (+ optional prefix) prepended to every tool path.
    pub base_url: String,

    /// Per-request timeout enforced by the HTTP transport.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// User-Agent header sent to the backend.
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("pm-tools-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Tool catalog sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Register the built-in project-management tool set.
    pub include_builtin: bool,

    /// Extra tool specs loaded from a JSON catalog file.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            catalog_path: None,
        }
    }
}

/// Stdio host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Server name reported during `initialize`.
    pub server_name: String,

    /// Maximum accepted request line in bytes.
    pub max_line_bytes: usize,

    /// Maximum tool calls in flight at once. Further calls wait for a slot.
    pub max_concurrent_calls: usize,

    /// Bounded channel capacity for outgoing responses.
    pub response_channel_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            server_name: "pm-tools".to_string(),
            max_line_bytes: 5 * 1024 * 1024,
            max_concurrent_calls: 64,
            response_channel_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend.timeout, Duration::from_secs(30));
        assert!(config.tools.include_builtin);
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"backend": {{"base_url": "https://pm.example.com", "timeout": "5s", "user_agent": "test"}}}}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "https://pm.example.com");
        assert_eq!(config.backend.timeout, Duration::from_secs(5));
        assert_eq!(config.host.server_name, "pm-tools");
    }

    #[test]
    fn test_from_file_partial_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"host": {{"max_concurrent_calls": 4}}, "tools": {{"include_builtin": false, "catalog_path": "extra.json"}}}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.host.max_concurrent_calls, 4);
        assert_eq!(config.host.max_line_bytes, 5 * 1024 * 1024);
        assert!(!config.tools.include_builtin);
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "http://backend:9000"),
            (ENV_TIMEOUT, "2m"),
            (ENV_CATALOG, "/etc/pm-tools/catalog.json"),
        ]);
        let mut config = Config::default();
        config
            .apply_vars(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.backend.base_url, "http://backend:9000");
        assert_eq!(config.backend.timeout, Duration::from_secs(120));
        assert_eq!(
            config.tools.catalog_path,
            Some(PathBuf::from("/etc/pm-tools/catalog.json"))
        );
    }

    #[test]
    fn test_env_bad_timeout() {
        let mut config = Config::default();
        let err = config
            .apply_vars(|key| (key == ENV_TIMEOUT).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT));
    }

    #[test]
    fn test_validate_rejects_empty_catalog() {
        let mut config = Config::default();
        config.tools.include_builtin = false;
        assert!(config.validate().is_err());

        config.tools.catalog_path = Some(PathBuf::from("tools.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config::default();
        config.host.max_concurrent_calls = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_line_limit() {
        let mut config = Config::default();
        config.host.max_line_bytes = usize::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("host.max_line_bytes"));

        config.host.max_line_bytes = MAX_LINE_BYTES_LIMIT;
        assert!(config.validate().is_ok());
    }
}
