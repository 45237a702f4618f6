//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FAVCACHE_*)
//! 2. TOML config file (if FAVCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FAVCACHE_*)
/// 2. TOML config file (if FAVCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via FAVCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Namespace that scopes every icon entry.
    ///
    /// Bump the trailing version to abandon entries written in an older format.
    /// Set via FAVCACHE_CACHE_NAMESPACE environment variable.
    #[serde(default = "default_cache_namespace")]
    pub cache_namespace: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FAVCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via FAVCACHE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FAVCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects followed per fetch.
    ///
    /// Set via FAVCACHE_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// URL prefixes that always bypass the icon cache (bundled assets).
    ///
    /// Set via FAVCACHE_LOCAL_ASSET_PREFIXES environment variable, using
    /// array syntax: `FAVCACHE_LOCAL_ASSET_PREFIXES='["/static/", "moz-extension://"]'`.
    /// A bare comma-separated list is read as a single string and rejected.
    #[serde(default = "default_local_asset_prefixes")]
    pub local_asset_prefixes: Vec<String>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./favcache.sqlite")
}

fn default_cache_namespace() -> String {
    "favicons-v1".into()
}

fn default_user_agent() -> String {
    "favcache/0.1".into()
}

fn default_max_bytes() -> usize {
    1_048_576 // 1MB
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_local_asset_prefixes() -> Vec<String> {
    vec!["/assets/".into(), "chrome-extension://".into(), "moz-extension://".into()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_namespace: default_cache_namespace(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            local_asset_prefixes: default_local_asset_prefixes(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FAVCACHE_`
    /// 2. TOML file from `FAVCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FAVCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FAVCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./favcache.sqlite"));
        assert_eq!(config.cache_namespace, "favicons-v1");
        assert_eq!(config.user_agent, "favcache/0.1");
        assert_eq!(config.max_bytes, 1_048_576);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.max_redirects, 5);
        assert!(config.local_asset_prefixes.contains(&"/assets/".to_string()));
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn test_load_from_toml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("favcache.toml", "cache_namespace = \"favicons-v2\"\ntimeout_ms = 2500")?;
            jail.set_env("FAVCACHE_CONFIG_FILE", "favcache.toml");
            jail.set_env("FAVCACHE_USER_AGENT", "test-agent/1.0");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_namespace, "favicons-v2");
            assert_eq!(config.timeout_ms, 2500);
            assert_eq!(config.user_agent, "test-agent/1.0");
            Ok(())
        });
    }

    #[test]
    fn test_local_asset_prefixes_from_env_array() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FAVCACHE_LOCAL_ASSET_PREFIXES", r#"["/static/", "moz-extension://"]"#);

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.local_asset_prefixes, vec!["/static/".to_string(), "moz-extension://".to_string()]);
            Ok(())
        });
    }

    #[test]
    fn test_local_asset_prefixes_comma_list_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FAVCACHE_LOCAL_ASSET_PREFIXES", "/static/,moz-extension://");

            assert!(matches!(AppConfig::load(), Err(ConfigError::LoadFailed(_))));
            Ok(())
        });
    }
}
