use std::result;

use crate::retry::RetryableError;
use thiserror::Error;

/// Error types for ELink and EGQuery operations
#[derive(Error, Debug)]
pub enum ELinkError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The response body was not well-formed XML
    #[error("XML parsing failed: {0}")]
    XmlError(String),

    /// The service reported a fault inside an otherwise valid document
    #[error("NCBI reported an error: {message}")]
    Upstream { message: String },

    /// A field the response shape requires is missing or unparseable
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Invalid request parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// API rate limit exceeded
    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
}

pub type Result<T> = result::Result<T, ELinkError>;

impl RetryableError for ELinkError {
    fn is_retryable(&self) -> bool {
        match self {
            ELinkError::RequestError(err) => {
                if err.is_timeout() || err.is_connect() {
                    return true;
                }

                if let Some(status) = err.status() {
                    return status.is_server_error() || status.as_u16() == 429;
                }

                !err.is_builder() && !err.is_redirect() && !err.is_decode()
            }

            ELinkError::RateLimitExceeded => true,

            ELinkError::ApiError { status, message } => {
                (*status >= 500 && *status < 600) || *status == 429 || {
                    let lower_msg = message.to_lowercase();
                    lower_msg.contains("temporarily unavailable")
                        || lower_msg.contains("timeout")
                        || lower_msg.contains("connection")
                }
            }

            // A document that parsed but is wrong will be wrong again
            ELinkError::XmlError(_)
            | ELinkError::Upstream { .. }
            | ELinkError::MalformedResponse { .. }
            | ELinkError::InvalidQuery(_) => false,
        }
    }

    fn retry_reason(&self) -> &str {
        if self.is_retryable() {
            match self {
                ELinkError::RequestError(err) if err.is_timeout() => "Request timeout",
                ELinkError::RequestError(err) if err.is_connect() => "Connection error",
                ELinkError::RequestError(_) => "Network error",
                ELinkError::RateLimitExceeded => "Rate limit exceeded",
                ELinkError::ApiError { status, .. } => match status {
                    429 => "Rate limit exceeded",
                    500..=599 => "Server error",
                    _ => "Temporary API error",
                },
                _ => "Transient error",
            }
        } else {
            match self {
                ELinkError::XmlError(_) => "Invalid XML response",
                ELinkError::Upstream { .. } => "Service reported an error",
                ELinkError::MalformedResponse { .. } => "Unexpected response shape",
                ELinkError::InvalidQuery(_) => "Invalid query",
                _ => "Non-transient error",
            }
        }
    }
}
