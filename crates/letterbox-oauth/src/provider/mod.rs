//! Identity provider endpoints.

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Read-only Gmail scope.
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// Google's `OpenID` discovery document.
pub const GOOGLE_DISCOVERY_URL: &str = "https://accounts.google.com/.well-known/openid-configuration";

/// Endpoints of an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    /// Display name.
    pub name: String,
    /// Where the user grants consent.
    pub auth_url: Url,
    /// Where codes are exchanged for tokens.
    pub token_url: Url,
    /// Where tokens are revoked, if supported.
    pub revocation_url: Option<Url>,
}

/// The endpoint fields of an `OpenID` discovery document.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryDocument {
    /// Authorization endpoint.
    pub authorization_endpoint: String,
    /// Token endpoint.
    pub token_endpoint: String,
    /// Revocation endpoint.
    #[serde(default)]
    pub revocation_endpoint: Option<String>,
}

impl Provider {
    /// Google's endpoints as of this writing. [`Provider::from_discovery`]
    /// is preferred at runtime.
    ///
    /// # Errors
    ///
    /// Never fails in practice; URL parsing is fallible in general.
    pub fn google() -> Result<Self> {
        Self::from_discovery(
            "Google",
            &DiscoveryDocument {
                authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth".into(),
                token_endpoint: "https://oauth2.googleapis.com/token".into(),
                revocation_endpoint: Some("https://oauth2.googleapis.com/revoke".into()),
            },
        )
    }

    /// Reads the endpoints advertised by a discovery document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if an endpoint is not a valid URL.
    pub fn from_discovery(name: impl Into<String>, document: &DiscoveryDocument) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(&document.authorization_endpoint)?,
            token_url: Url::parse(&document.token_endpoint)?,
            revocation_url: document
                .revocation_endpoint
                .as_deref()
                .map(Url::parse)
                .transpose()?,
        })
    }

    /// Checks that consent and token traffic is encrypted.
    ///
    /// Plain HTTP is accepted only on `127.0.0.1`, for local test servers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the offending endpoint.
    pub fn validate(&self) -> Result<()> {
        let endpoints = [
            Some(("authorization", &self.auth_url)),
            Some(("token", &self.token_url)),
            self.revocation_url.as_ref().map(|url| ("revocation", url)),
        ];
        for (label, url) in endpoints.into_iter().flatten() {
            if url.scheme() != "https" && url.host_str() != Some("127.0.0.1") {
                return Err(Error::InvalidConfig(format!(
                    "{} {label} endpoint must use https",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_google_endpoints() {
        let provider = Provider::google().unwrap();
        assert_eq!(provider.name, "Google");
        assert_eq!(provider.token_url.as_str(), "https://oauth2.googleapis.com/token");
        assert!(provider.revocation_url.is_some());
        provider.validate().unwrap();
    }

    #[test]
    fn test_discovery_document() {
        let document: DiscoveryDocument = serde_json::from_str(
            r#"{
                "issuer": "https://accounts.google.com",
                "authorization_endpoint": "https://accounts.google.com/o/oauth2/v2/auth",
                "token_endpoint": "https://oauth2.googleapis.com/token",
                "revocation_endpoint": "https://oauth2.googleapis.com/revoke",
                "scopes_supported": ["openid", "email"]
            }"#,
        )
        .unwrap();

        assert_eq!(
            Provider::from_discovery("Google", &document).unwrap(),
            Provider::google().unwrap()
        );
    }

    #[test]
    fn test_discovery_without_revocation() {
        let document: DiscoveryDocument = serde_json::from_str(
            r#"{"authorization_endpoint": "http://127.0.0.1:8080/auth", "token_endpoint": "http://127.0.0.1:8080/token"}"#,
        )
        .unwrap();
        let provider = Provider::from_discovery("Local", &document).unwrap();
        assert!(provider.revocation_url.is_none());
        provider.validate().unwrap();
    }

    #[test]
    fn test_plain_http_rejected() {
        let document = DiscoveryDocument {
            authorization_endpoint: "http://auth.example.com/authorize".into(),
            token_endpoint: "https://auth.example.com/token".into(),
            revocation_endpoint: None,
        };
        let provider = Provider::from_discovery("Custom", &document).unwrap();
        assert!(matches!(provider.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_url() {
        let document = DiscoveryDocument {
            authorization_endpoint: "not a url".into(),
            token_endpoint: "https://auth.example.com/token".into(),
            revocation_endpoint: None,
        };
        assert!(matches!(
            Provider::from_discovery("Custom", &document),
            Err(Error::Url(_))
        ));
    }
}
