//! Client configuration.
//!
//! Configuration is stored in `<root>/config.yaml`, where `<root>` is
//! `$FLORANET_ROOT` or `.floranet`, and includes:
//! - The backend base URL
//! - The bearer token for the admin account
//! - Search debounce and request timeout settings
//!
//! `FLORANET_API_BASE_URL` and `FLORANET_API_TOKEN` override the file.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::http::parse_base_url;
use crate::error::{FloranetError, Result};

pub const ROOT_ENV: &str = "FLORANET_ROOT";
pub const BASE_URL_ENV: &str = "FLORANET_API_BASE_URL";
pub const TOKEN_ENV: &str = "FLORANET_API_TOKEN";

/// Keys accepted by `config get` and `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "api_base_url",
    "auth.token",
    "search_debounce_ms",
    "request_timeout",
];

/// Returns the configuration directory.
pub fn floranet_root() -> PathBuf {
    match env::var(ROOT_ENV) {
        Ok(root) if !root.is_empty() => PathBuf::from(root),
        _ => PathBuf::from(".floranet"),
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL, including any `/api` prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "AuthConfig::is_empty")]
    pub auth: AuthConfig,

    /// Quiet period before a typed search is sent (default: 500)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Request timeout in seconds; unset means the HTTP client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
}

fn default_search_debounce_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            auth: AuthConfig::default(),
            search_debounce_ms: default_search_debounce_ms(),
            request_timeout: None,
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthConfig {
    fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        floranet_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            FloranetError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                FloranetError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            FloranetError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Owner read/write only; the file holds the bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&path, permissions).map_err(|e| {
                FloranetError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set permissions on config at {}: {}", path.display(), e),
                ))
            })?;
        }

        Ok(())
    }

    /// Base URL from the environment or config file, validated
    pub fn api_base_url(&self) -> Result<Url> {
        let raw = non_empty_env(BASE_URL_ENV)
            .or_else(|| self.api_base_url.clone())
            .ok_or_else(|| {
                FloranetError::Config(format!(
                    "api_base_url is not set. Run `floranet config set api_base_url <url>` or set {}",
                    BASE_URL_ENV
                ))
            })?;
        parse_base_url(&raw)
    }

    /// Bearer token from the environment or config file
    pub fn api_token(&self) -> Option<String> {
        non_empty_env(TOKEN_ENV).or_else(|| self.auth.token.clone())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Read one key as it would be displayed. Tokens are masked.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "api_base_url" => Ok(self.api_base_url.clone()),
            "auth.token" => Ok(self.api_token().map(|t| mask_sensitive_value(&t))),
            "search_debounce_ms" => Ok(Some(self.search_debounce_ms.to_string())),
            "request_timeout" => Ok(self.request_timeout.map(|t| t.to_string())),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set one key from its string form, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_base_url" => {
                let url = parse_base_url(value)?;
                self.api_base_url = Some(url.to_string());
            }
            "auth.token" => {
                let token = value.trim();
                self.auth.token = (!token.is_empty()).then(|| token.to_string());
            }
            "search_debounce_ms" => {
                self.search_debounce_ms = parse_number(key, value)?;
            }
            "request_timeout" => {
                let value = value.trim();
                self.request_timeout = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(parse_number(key, value)?)
                };
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        FloranetError::Config(format!(
            "invalid value '{value}' for {key}. Expected a non-negative integer"
        ))
    })
}

fn unknown_key(key: &str) -> FloranetError {
    FloranetError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_base_url.is_none());
        assert!(config.auth.token.is_none());
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_yaml_ng::from_str("api_base_url: https://floranet.test/api\n").unwrap();
        assert_eq!(config.search_debounce_ms, 500);
        assert_eq!(config.api_base_url.as_deref(), Some("https://floranet.test/api"));
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        assert!(config.set("api_base_url", "ftp://nope").is_err());
        assert!(config.set("search_debounce_ms", "soon").is_err());
        assert!(config.set("theme", "dark").is_err());

        config.set("request_timeout", "15").unwrap();
        assert_eq!(config.request_timeout, Some(15));
        config.set("request_timeout", "none").unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.set("auth.token", "secret-token-value").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token-value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_mask_sensitive_value() {
        assert_eq!(mask_sensitive_value("abcdefgh"), "ab...gh");
        assert_eq!(mask_sensitive_value("abc"), "****");
    }

    #[test]
    fn test_serialization_skips_unset() {
        let yaml = serde_yaml_ng::to_string(&Config::default()).unwrap();
        assert!(!yaml.contains("auth"));
        assert!(!yaml.contains("api_base_url"));
        assert!(yaml.contains("search_debounce_ms: 500"));
    }
}
