//! Error types for catalog requests.

use thiserror::Error;

/// Errors that can occur while talking to the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No API key in config or environment
    #[error("Missing API key: set catalog.api_key or the {env_var} environment variable")]
    MissingApiKey { env_var: String },

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The configured base URL is not a valid URL
    #[error("Invalid catalog URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, timeout or body transfer failure
    #[error("Request to '{endpoint}' failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The catalog answered with a non-success status
    #[error("Catalog returned {status} for '{endpoint}': {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Whether a later retry of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Transport { .. } => true,
            CatalogError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
