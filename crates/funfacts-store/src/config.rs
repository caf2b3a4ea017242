//! Process-wide store configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::StoreError;

/// Environment variable holding the store's base URL.
pub const STORE_URL_ENV: &str = "FUNFACTS_STORE_URL";

/// Environment variable holding the store's access key.
pub const API_KEY_ENV: &str = "FUNFACTS_API_KEY";

/// Environment variable holding an optional request timeout in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "FUNFACTS_REQUEST_TIMEOUT_SECS";

/// Endpoint and credential for the remote store.
///
/// Injected once at process start from flags or the variables above; never
/// compiled in.
#[derive(Clone)]
pub struct StoreConfig {
    url: Url,
    api_key: String,
    request_timeout: Option<Duration>,
}

impl StoreConfig {
    /// Build a config from a base URL and access key.
    pub fn new(url: &str, api_key: impl Into<String>) -> Result<Self, StoreError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StoreError::Config("API key is empty".to_string()));
        }

        let mut url = Url::parse(url.trim())?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(StoreError::Config(format!(
                "store URL must be http or https, got '{}'",
                url.scheme()
            )));
        }
        // Url::join treats a path without a trailing slash as a file name.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            url,
            api_key,
            request_timeout: None,
        })
    }

    /// Set a timeout applied to every request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
