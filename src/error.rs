//! Application error types.
//!
//! A single error enum covers the whole request path: decoding the inbound
//! notification, talking to GitLab, and reading configuration at startup.

use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// The inbound webhook body could not be decoded as a notification.
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String },

    /// GitLab answered with something other than `201 Created`.
    #[error("GitLab API error: {message}")]
    GitLabApi {
        message: String,
        status_code: Option<u16>,
        endpoint: Option<String>,
    },

    /// The request never got an HTTP answer (connect, DNS, timeout).
    #[error("Network error: {message}")]
    Network { message: String },

    /// A configuration value was present but unusable.
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        variable: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    /// Create a GitLab API error with status code and endpoint.
    pub fn gitlab_api_full(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::GitLabApi {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a configuration error naming the offending variable.
    pub fn configuration(message: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            variable: Some(variable.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than by us.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidPayload { .. })
    }

    /// HTTP status GitLab returned, if the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::GitLabApi { status_code, .. } => *status_code,
            _ => None,
        }
    }
}

// Conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            Self::network(format!("Failed to connect to server: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_payload(err.to_string())
    }
}
