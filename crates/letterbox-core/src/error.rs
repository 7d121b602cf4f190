//! Error types for the mail import adapter.

use thiserror::Error;

/// Errors raised while signing in to or reading from the mail provider.
#[derive(Debug, Error)]
pub enum Error {
    /// The identity provider could not be loaded.
    #[error("Failed to load identity services: {0}")]
    Initialization(String),

    /// An operation was called before its setup step.
    #[error("Token client not initialized. Call init_token_client first.")]
    NotInitialized,

    /// The identity provider rejected the consent request.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// No consent answer arrived in time.
    #[error("Authentication timed out after {0} seconds")]
    Timeout(u64),

    /// A sign-in request is already waiting for the user.
    #[error("A sign-in request is already in progress")]
    ConcurrentRequest,

    /// An API call was attempted without an access token.
    #[error("Not authenticated. Please authenticate first.")]
    AuthRequired,

    /// The provider rejected the token; it has been discarded.
    #[error("Authentication expired. Please sign in again.")]
    TokenExpired,

    /// The API call failed or returned an error status.
    #[error("{0}")]
    Fetch(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The API answered with a body that could not be decoded.
    #[error("Malformed API response: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<letterbox_oauth::Error> for Error {
    fn from(error: letterbox_oauth::Error) -> Self {
        match error {
            letterbox_oauth::Error::Timeout(secs) => Self::Timeout(secs),
            letterbox_oauth::Error::ConcurrentRequest => Self::ConcurrentRequest,
            other => Self::Auth(other.to_string()),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_error_mapping() {
        assert!(matches!(
            Error::from(letterbox_oauth::Error::Timeout(30)),
            Error::Timeout(30)
        ));
        assert!(matches!(
            Error::from(letterbox_oauth::Error::ConcurrentRequest),
            Error::ConcurrentRequest
        ));
        assert!(matches!(
            Error::from(letterbox_oauth::Error::AccessDenied),
            Error::Auth(ref message) if message == "User denied authorization"
        ));
    }
}
