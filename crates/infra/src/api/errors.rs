//! Errors raised while talking to the Mia backend
//!
//! Variants follow the HTTP status class of the failure. Crossing into the
//! domain, rate limiting and server faults become retryable network errors.

use std::time::Duration;

use mia_domain::MiaError;
use thiserror::Error;

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl From<MiaError> for ApiError {
    fn from(err: MiaError) -> Self {
        match err {
            MiaError::Network(message) => Self::Network(message),
            MiaError::Auth(message) => Self::Auth(message),
            MiaError::Config(message) => Self::Config(message),
            MiaError::NotFound(message) | MiaError::InvalidInput(message) => Self::Client(message),
            MiaError::Storage(message) | MiaError::Internal(message) => Self::Server(message),
        }
    }
}

impl From<ApiError> for MiaError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Auth(_) => Self::Auth(message),
            ApiError::RateLimit(_) | ApiError::Server(_) | ApiError::Network(_) | ApiError::Timeout(_) => {
                Self::Network(message)
            }
            ApiError::Client(_) => Self::InvalidInput(message),
            ApiError::Config(_) => Self::Config(message),
        }
    }
}
