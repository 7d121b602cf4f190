//! Access tokens and the token endpoint's answers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Margin before expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A granted bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The bearer value.
    pub access_token: String,
    /// Scopes actually granted, space separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// When the provider said the token stops working.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Builds a token from a grant received at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`] for a non-bearer or empty token.
    pub fn from_grant(grant: TokenResponse, now: DateTime<Utc>) -> Result<Self> {
        if grant.access_token.is_empty() {
            return Err(Error::InvalidResponse("empty access token".into()));
        }
        if !grant.token_type.eq_ignore_ascii_case("bearer") {
            return Err(Error::InvalidResponse(format!(
                "unsupported token type {}",
                grant.token_type
            )));
        }

        Ok(Self {
            access_token: grant.access_token,
            scope: grant.scope,
            expires_at: grant
                .expires_in
                .map(|secs| now + Duration::seconds(i64::from(secs))),
        })
    }

    /// Builds a token from a grant received just now.
    ///
    /// # Errors
    ///
    /// See [`Token::from_grant`].
    pub fn from_response(grant: TokenResponse) -> Result<Self> {
        Self::from_grant(grant, Utc::now())
    }

    /// Returns true if the token expires within a minute of `now`.
    #[must_use]
    pub fn expires_before(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| now + Duration::seconds(EXPIRY_MARGIN_SECS) >= at)
    }

    /// Returns true if the token is expired or about to be.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_before(Utc::now())
    }
}

/// Successful answer of the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type; Google always sends `Bearer`.
    #[serde(default = "bearer_type")]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u32>,
    /// Granted scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// A bearer grant with no expiry or scope.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: bearer_type(),
            expires_in: None,
            scope: None,
        }
    }
}

fn bearer_type() -> String {
    "Bearer".to_string()
}

/// Error answer of an identity endpoint, also used to report a failed
/// consent attempt through a callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,
    /// Description; may be absent.
    #[serde(default)]
    pub error_description: String,
}

impl ErrorResponse {
    /// Creates an error answer.
    #[must_use]
    pub fn new(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_description: description.into(),
        }
    }

    /// Converts the answer into an [`Error`]. `access_denied` becomes
    /// [`Error::AccessDenied`].
    #[must_use]
    pub fn into_error(self) -> Error {
        match self.error.as_str() {
            "access_denied" => Error::AccessDenied,
            _ => Error::provider(self.error, self.error_description),
        }
    }
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        match error {
            Error::Provider { code, description } => Self::new(code.as_str(), description.as_str()),
            Error::AccessDenied => Self::new("access_denied", ""),
            other => Self::new("consent_failed", other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_grant_with_lifetime() {
        let grant: TokenResponse = serde_json::from_str(
            r#"{"access_token":"ya29.test","token_type":"Bearer","expires_in":3599,"scope":"https://www.googleapis.com/auth/gmail.readonly"}"#,
        )
        .unwrap();
        let received = at("2025-10-14T10:00:00Z");

        let token = Token::from_grant(grant, received).unwrap();
        assert_eq!(token.access_token, "ya29.test");
        assert_eq!(token.expires_at, Some(at("2025-10-14T10:59:59Z")));
        assert!(!token.expires_before(at("2025-10-14T10:30:00Z")));
        assert!(token.expires_before(at("2025-10-14T10:59:00Z")));
    }

    #[test]
    fn test_grant_without_lifetime_never_expires() {
        let token = Token::from_response(TokenResponse::bearer("ya29.test")).unwrap();
        assert!(token.expires_at.is_none());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let grant: TokenResponse = serde_json::from_str(r#"{"access_token":"x"}"#).unwrap();
        assert_eq!(grant.token_type, "Bearer");
    }

    #[test]
    fn test_unusable_grants_rejected() {
        assert!(matches!(
            Token::from_response(TokenResponse::bearer("")),
            Err(Error::InvalidResponse(_))
        ));

        let mut mac = TokenResponse::bearer("x");
        mac.token_type = "MAC".into();
        assert!(matches!(
            Token::from_response(mac),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_error_answers() {
        assert!(matches!(
            ErrorResponse::new("access_denied", "").into_error(),
            Error::AccessDenied
        ));

        let other = ErrorResponse::new("popup_closed", "window closed").into_error();
        assert!(matches!(other, Error::Provider { ref code, .. } if code == "popup_closed"));
        assert_eq!(other.to_string(), "popup_closed: window closed");

        let back = ErrorResponse::from(&Error::Timeout(30));
        assert_eq!(back.error, "consent_failed");
        assert_eq!(ErrorResponse::from(&Error::AccessDenied).into_error().to_string(), "User denied authorization");
    }
}
