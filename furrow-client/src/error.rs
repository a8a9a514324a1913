//! Error types for the Furrow client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the farm-management API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Check if retrying the same request may succeed
    ///
    /// Transport failures, 5xx responses and 429 are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) => true,
            Self::ApiError { status: 429, .. } => true,
            _ => self.is_server_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let not_found = ClientError::api_error(404, "no such job");
        assert!(not_found.is_not_found());
        assert!(!not_found.is_transient());

        let unavailable = ClientError::api_error(503, "maintenance");
        assert!(unavailable.is_server_error());
        assert!(unavailable.is_transient());

        assert!(ClientError::api_error(429, "slow down").is_transient());
        assert!(!ClientError::ParseError("bad json".to_string()).is_transient());
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::api_error(500, "boom");
        assert_eq!(err.to_string(), "API error (status 500): boom");
    }
}
