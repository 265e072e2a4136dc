//! Error types for the session API client.

use thiserror::Error;

/// Errors that can occur when talking to the remote session API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The server rejected our credentials, even after re-reading them once.
    #[error("Not signed in or token expired")]
    Unauthorized,

    /// No credentials are available at all.
    #[error("No access token found (set POMOTUI_TOKEN or write the token file)")]
    MissingToken,

    /// The requested resource does not exist.
    #[error("Resource not found")]
    NotFound,

    /// Server returned a 5xx status.
    #[error("Server error (HTTP {0})")]
    Server(u16),

    /// Server returned a status we do not handle.
    #[error("Unexpected response (HTTP {0})")]
    Unexpected(u16),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl ApiError {
    /// Whether this error means the user has to sign in again
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors() {
        assert!(ApiError::Unauthorized.is_auth());
        assert!(ApiError::MissingToken.is_auth());
        assert!(!ApiError::NotFound.is_auth());
        assert!(!ApiError::Server(503).is_auth());
    }

    #[test]
    fn test_display_includes_status() {
        assert_eq!(ApiError::Server(502).to_string(), "Server error (HTTP 502)");
        assert_eq!(
            ApiError::Unexpected(418).to_string(),
            "Unexpected response (HTTP 418)"
        );
    }
}
