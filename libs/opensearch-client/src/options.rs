//! Connection options
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `OPENSEARCH_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULTS: &str = include_str!("../config/default.toml");

/// Environment variable naming the options file.
pub const CONFIG_PATH_VAR: &str = "OPENSEARCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/opensearch.toml";
pub const ENV_PREFIX: &str = "OPENSEARCH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSearchOptions {
    /// Server address, with or without scheme.
    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub enable_http_compression: bool,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Health probe timeout in seconds
    #[serde(default = "default_health_check_timeout")]
    pub health_check_timeout: u64,
}

fn default_request_timeout() -> u64 {
    60
}

fn default_health_check_timeout() -> u64 {
    2
}

impl Default for OpenSearchOptions {
    fn default() -> Self {
        Self {
            server: String::new(),
            user: None,
            password: None,
            enable_http_compression: false,
            request_timeout: default_request_timeout(),
            health_check_timeout: default_health_check_timeout(),
        }
    }
}

impl OpenSearchOptions {
    /// Load options from the file named by `OPENSEARCH_CONFIG` (if present)
    /// and the environment.
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    /// Load options from `config_path` (optional) and the environment.
    pub fn load_from(config_path: &str) -> Result<Self> {
        let options = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;

        tracing::debug!(
            server = %options.server,
            authenticated = options.password.is_some(),
            "loaded OpenSearch options"
        );
        Ok(options)
    }

    /// Parse options from TOML text layered over the defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_file() {
        let options = OpenSearchOptions::from_toml("").unwrap();
        assert_eq!(options, OpenSearchOptions::default());
    }

    #[test]
    fn toml_overrides_defaults() {
        let options = OpenSearchOptions::from_toml(
            r#"
            server = "search.local:9200"
            user = "admin"
            password = "secret"
            enable_http_compression = true
            request_timeout = 15
            "#,
        )
        .unwrap();

        assert_eq!(options.server, "search.local:9200");
        assert_eq!(options.user.as_deref(), Some("admin"));
        assert_eq!(options.password.as_deref(), Some("secret"));
        assert!(options.enable_http_compression);
        assert_eq!(options.request_timeout, 15);
        assert_eq!(options.health_check_timeout, 2);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let options = OpenSearchOptions::load_from("does/not/exist.toml").unwrap();
        assert_eq!(options.health_check_timeout, 2);
    }
}
