//! Error types for the remote store client.

use thiserror::Error;

/// Errors that can occur when talking to the remote store.
///
/// Every variant is a "remote operation failed" from the caller's point of
/// view; none of them are retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store URL could not be parsed or joined.
    #[error("invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Error reported by the store's REST layer.
    #[error("store error ({status}){}: {message}", code.as_deref().map(|c| format!(" {}", c)).unwrap_or_default())]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Rate limited.
    #[error("rate limited{}", match retry_after_secs {
        Some(secs) => format!(" (retry after {}s)", secs),
        None => String::new(),
    })]
    RateLimited {
        /// Seconds to wait before retrying (from Retry-After header, optional).
        retry_after_secs: Option<u64>,
    },

    /// Invalid response from server.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
