//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SUCCESS_DISMISS_MS: u64 = 3000;
pub const DEFAULT_ERROR_DISMISS_MS: u64 = 5000;

/// Overrides the directory holding the global `config.yaml`
pub const CONFIG_DIR_ENV: &str = "PORTAL_CONFIG_DIR";

/// Valid configuration keys with their descriptions
pub const VALID_KEYS: &[(&str, &str)] = &[
    ("base_url", "Root URL of the backend API"),
    ("page_size", "Records per page in list views"),
    ("timeout_secs", "Per-request timeout in seconds"),
    ("success_dismiss_ms", "How long success messages stay visible"),
    ("error_dismiss_ms", "How long error messages stay visible"),
    (
        "default_format",
        "Default output format (tsv, json, yaml, csv, md, id)",
    ),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown configuration key '{0}' (run `portal config keys`)")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },

    #[error("Could not determine global config directory")]
    NoConfigDir,
}

/// Portal configuration with layered hierarchy
///
/// Unset fields fall back to built-in defaults through the accessor
/// methods, so a partially filled file stays valid.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,

    pub page_size: Option<u32>,

    pub timeout_secs: Option<u64>,

    pub success_dismiss_ms: Option<u64>,

    pub error_dismiss_ms: Option<u64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (applied by the accessors)

        // 2. Global user config (~/.config/portal/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                match std::fs::read_to_string(&global_path)
                    .map_err(|e| e.to_string())
                    .and_then(|s| serde_yml::from_str::<Option<Config>>(&s).map_err(|e| e.to_string()))
                {
                    Ok(Some(global)) => config.merge(global),
                    Ok(None) => {}
                    Err(e) => tracing::warn!(
                        path = %global_path.display(),
                        "ignoring unreadable config file: {}",
                        e
                    ),
                }
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env());

        config
    }

    /// Settings taken from `PORTAL_*` environment variables
    fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(url) = std::env::var("PORTAL_BASE_URL") {
            config.base_url = Some(url);
        }
        config.page_size = env_number("PORTAL_PAGE_SIZE");
        config.timeout_secs = env_number("PORTAL_TIMEOUT_SECS");
        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("config.yaml"));
        }
        directories::ProjectDirs::from("", "", "portal")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.success_dismiss_ms.is_some() {
            self.success_dismiss_ms = other.success_dismiss_ms;
        }
        if other.error_dismiss_ms.is_some() {
            self.error_dismiss_ms = other.error_dismiss_ms;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn success_dismiss(&self) -> Duration {
        Duration::from_millis(self.success_dismiss_ms.unwrap_or(DEFAULT_SUCCESS_DISMISS_MS))
    }

    pub fn error_dismiss(&self) -> Duration {
        Duration::from_millis(self.error_dismiss_ms.unwrap_or(DEFAULT_ERROR_DISMISS_MS))
    }

    /// Effective value of a key, defaults included
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(match key {
            "base_url" => Some(self.base_url().to_string()),
            "page_size" => Some(self.page_size().to_string()),
            "timeout_secs" => Some(self.timeout().as_secs().to_string()),
            "success_dismiss_ms" => Some(self.success_dismiss().as_millis().to_string()),
            "error_dismiss_ms" => Some(self.error_dismiss().as_millis().to_string()),
            "default_format" => self.default_format.clone(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        })
    }

    /// Check and convert a raw value for `key` into its YAML form
    pub fn parse_value(key: &str, raw: &str) -> Result<serde_yml::Value, ConfigError> {
        let invalid = |reason| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason,
        };

        match key {
            "base_url" => {
                if raw.starts_with("http://") || raw.starts_with("https://") {
                    Ok(serde_yml::Value::String(raw.trim_end_matches('/').to_string()))
                } else {
                    Err(invalid("must start with http:// or https://"))
                }
            }
            "page_size" | "timeout_secs" | "success_dismiss_ms" | "error_dismiss_ms" => {
                match raw.parse::<u64>() {
                    Ok(n) if n > 0 => Ok(serde_yml::Value::Number(n.into())),
                    _ => Err(invalid("must be a positive whole number")),
                }
            }
            "default_format" => match raw {
                "auto" | "tsv" | "json" | "yaml" | "csv" | "md" | "id" => {
                    Ok(serde_yml::Value::String(raw.to_string()))
                }
                _ => Err(invalid("expected one of auto, tsv, json, yaml, csv, md, id")),
            },
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a number", name, raw);
            None
        }
    }
}
