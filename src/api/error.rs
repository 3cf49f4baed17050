//! Error types for the commerce API client.
//!
//! Every failure mode of a fetch is classified here so callers can turn
//! it into state instead of propagating a fault.

use thiserror::Error;

/// Errors that can occur while talking to the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),

    /// Base URL or endpoint path could not form a valid URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network-level failure (DNS, connect, reset, body read)
    #[error("Connection failed for '{path}': {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded total timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} from '{path}'")]
    Status { path: String, status: u16 },

    /// Envelope carried `status: false`
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    /// Body was not JSON or not the expected record shape
    #[error("Malformed response from '{path}': {reason}")]
    Decode { path: String, reason: String },

    /// Single-record lookup produced no record
    #[error("{what} not found")]
    NotFound { what: String },
}

impl ApiError {
    /// Short machine-readable classification, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Setup(_) => "setup",
            ApiError::InvalidUrl { .. } => "invalid_url",
            ApiError::Transport { .. } => "transport",
            ApiError::Timeout { .. } => "timeout",
            ApiError::Status { .. } => "http_status",
            ApiError::Rejected { .. } => "rejected",
            ApiError::Decode { .. } => "decode",
            ApiError::NotFound { .. } => "not_found",
        }
    }
}
