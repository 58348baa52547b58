//! Access layer configuration
//!
//! Configuration can be read from a JSON file or assembled from environment
//! variables on top of the defaults.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::error::{AccessError, AccessResult};
use crate::permissions::PermissionResolver;

/// Environment variable overriding the session storage directory
pub const ENV_STORAGE_DIR: &str = "FACILITY_ACCESS_STORAGE_DIR";

/// Environment variable toggling legacy name matching
pub const ENV_LEGACY_NAMES: &str = "FACILITY_ACCESS_LEGACY_NAMES";

/// Environment variable enabling file logging
pub const ENV_LOG_DIR: &str = "FACILITY_ACCESS_LOG_DIR";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Directory for daily rolling log files (stderr when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "facility_access=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            log_dir: None,
        }
    }
}

/// Top-level configuration for the access layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Directory holding cached sessions
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Whether queries may also match a record's legacy `name`
    #[serde(default = "default_legacy_name_matching")]
    pub legacy_name_matching: bool,

    /// Logging setup
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("sessions")
}

fn default_legacy_name_matching() -> bool {
    true
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            legacy_name_matching: default_legacy_name_matching(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AccessConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> AccessResult<Self> {
        let file = File::open(path.as_ref())?;
        let config: AccessConfig = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Build configuration from environment variables
    pub fn from_env() -> AccessResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AccessResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_STORAGE_DIR) {
            config.storage_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_LEGACY_NAMES) {
            config.legacy_name_matching = parse_bool(ENV_LEGACY_NAMES, &raw)?;
        }

        if let Some(dir) = lookup(ENV_LOG_DIR) {
            config.logging.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Set the storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Enable or disable legacy name matching
    pub fn with_legacy_name_matching(mut self, enabled: bool) -> Self {
        self.legacy_name_matching = enabled;
        self
    }

    /// Set the logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Resolver configured with this policy
    pub fn resolver(&self) -> PermissionResolver {
        PermissionResolver::new().with_legacy_name_matching(self.legacy_name_matching)
    }
}

fn parse_bool(key: &str, raw: &str) -> AccessResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AccessError::InvalidConfig(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AccessConfig::new();
        assert_eq!(config.storage_dir, PathBuf::from("sessions"));
        assert!(config.legacy_name_matching);
        assert!(config.logging.log_dir.is_none());
        assert!(config.resolver().legacy_name_matching());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AccessConfig::from_lookup(lookup_from(&[
            (ENV_STORAGE_DIR, "/var/cache/access"),
            (ENV_LEGACY_NAMES, "false"),
            (ENV_LOG_DIR, "/var/log/access"),
        ]))
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/var/cache/access"));
        assert!(!config.legacy_name_matching);
        assert_eq!(
            config.logging.log_dir,
            Some(PathBuf::from("/var/log/access"))
        );
        assert!(!config.resolver().legacy_name_matching());
    }

    #[test]
    fn test_from_lookup_rejects_bad_bool() {
        let err = AccessConfig::from_lookup(lookup_from(&[(ENV_LEGACY_NAMES, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "legacy_name_matching": false }}"#).unwrap();

        let config = AccessConfig::from_file(file.path()).unwrap();
        assert!(!config.legacy_name_matching);
        assert_eq!(config.storage_dir, PathBuf::from("sessions"));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = AccessConfig::new()
            .with_storage_dir("/tmp/s")
            .with_legacy_name_matching(false)
            .with_logging(LoggingConfig {
                json: true,
                ..LoggingConfig::default()
            });

        assert_eq!(config.storage_dir, PathBuf::from("/tmp/s"));
        assert!(!config.legacy_name_matching);
        assert!(config.logging.json);
    }
}
