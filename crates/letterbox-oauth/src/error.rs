//! Error types for sign-in and token handling.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Sign-in errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Loopback listener failure.
    #[error("Loopback listener error: {0}")]
    Io(#[from] std::io::Error),

    /// Request to an identity endpoint failed.
    #[error("Identity request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An identity endpoint answered with malformed JSON.
    #[error("Malformed identity response: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered with an error code.
    #[error("{code}: {description}")]
    Provider {
        /// Error code such as `invalid_grant`.
        code: String,
        /// Free-form description; may be empty.
        description: String,
    },

    /// The provider's answer could not be used.
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// No consent answer arrived in time.
    #[error("Consent timed out after {0} seconds")]
    Timeout(u64),

    /// The user declined the consent screen.
    #[error("User denied authorization")]
    AccessDenied,

    /// A consent request is already waiting for an answer.
    #[error("A consent request is already in progress")]
    ConcurrentRequest,

    /// Endpoint or client configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An endpoint is not a valid URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Creates a [`Error::Provider`] error.
    #[must_use]
    pub fn provider(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Provider {
            code: code.into(),
            description: description.into(),
        }
    }
}
