//! Connection settings derived from [`OpenSearchOptions`]

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::options::OpenSearchOptions;

/// User name sent when only a password is configured.
pub const DEFAULT_USER: &str = "openSearch";

#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub server: Url,
    pub credentials: Option<BasicAuth>,
    pub enable_http_compression: bool,
    pub request_timeout: Duration,
    pub health_check_timeout: Duration,
}

impl ConnectionSettings {
    pub fn from_options(options: &OpenSearchOptions) -> Result<Self> {
        let server = server_url(&options.server)?;

        let credentials = options.password.as_ref().map(|password| BasicAuth {
            user: options
                .user
                .clone()
                .filter(|user| !user.is_empty())
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: password.clone(),
        });

        Ok(Self {
            server,
            credentials,
            enable_http_compression: options.enable_http_compression,
            request_timeout: Duration::from_secs(options.request_timeout),
            health_check_timeout: Duration::from_secs(options.health_check_timeout),
        })
    }

    /// Absolute URL for `path` below the server address.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Normalize a configured server address into a URL.
///
/// A missing scheme defaults to `http://`; trailing slashes are dropped.
pub fn server_url(server: &str) -> Result<Url> {
    let server = server.trim();
    if server.is_empty() {
        return Err(Error::Configuration(
            "'Server' parameter must not be empty".to_string(),
        ));
    }

    let lower = server.to_ascii_lowercase();
    let address = if lower.starts_with("http://") || lower.starts_with("https://") {
        server.to_string()
    } else {
        format!("http://{server}")
    };

    Ok(Url::parse(address.trim_end_matches('/'))?)
}
