//! Error taxonomy for the upstream boundary
//!
//! Extraction never fails; only fetching, query validation and configuration do.
//! Errors are surfaced unchanged to the caller, which decides about retries.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum KoreansoolError {
    #[error("Upstream request failed: {url} - {message}")]
    UpstreamRequest {
        url: String,
        message: String,
        timed_out: bool,
    },

    #[error("Upstream returned HTTP {status}: {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Failed to read upstream body: {url} - {message}")]
    UpstreamBody { url: String, message: String },

    #[error("Upstream request cancelled: {url}")]
    Cancelled { url: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String, field: String },
}

impl KoreansoolError {
    /// Create a request error from a transport failure
    pub fn upstream_request(url: &str, error: &reqwest::Error) -> Self {
        Self::UpstreamRequest {
            url: url.to_string(),
            message: error.to_string(),
            timed_out: error.is_timeout(),
        }
    }

    pub fn upstream_status(status: u16, url: &str) -> Self {
        Self::UpstreamStatus {
            status,
            url: url.to_string(),
        }
    }

    pub fn upstream_body(url: &str, error: &reqwest::Error) -> Self {
        Self::UpstreamBody {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    pub fn cancelled(url: &str) -> Self {
        Self::Cancelled { url: url.to_string() }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    pub fn configuration(field: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: field.to_string(),
        }
    }

    /// Check if retrying the same request could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UpstreamRequest { .. } => true,
            Self::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            Self::UpstreamBody { .. } => true,
            Self::Cancelled { .. } => false,
            Self::InvalidQuery { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get retry delay in seconds for recoverable errors
    pub fn retry_delay_seconds(&self) -> Option<u64> {
        match self {
            Self::UpstreamRequest { timed_out: true, .. } => Some(10),
            Self::UpstreamRequest { .. } | Self::UpstreamBody { .. } => Some(2),
            Self::UpstreamStatus { status: 429, .. } => Some(30),
            Self::UpstreamStatus { status, .. } if *status >= 500 => Some(5),
            _ => None,
        }
    }
}

pub type KoreansoolResult<T> = Result<T, KoreansoolError>;
