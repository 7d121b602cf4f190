//! A single browser consent round trip with PKCE.

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::pkce::{PkceChallenge, random_token};
use crate::error::{Error, Result};
use crate::identity::TokenClientConfig;
use crate::provider::Provider;
use crate::token::{ErrorResponse, TokenResponse};

/// One consent attempt.
///
/// Every attempt carries a fresh `state` value and PKCE verifier, so a
/// redirect or code left over from an earlier attempt cannot complete this
/// one.
#[derive(Debug, Clone)]
pub struct ConsentRequest {
    provider: Provider,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
    scope: String,
    prompt: Option<String>,
    state: String,
    pkce: PkceChallenge,
}

impl ConsentRequest {
    /// Prepares an attempt whose redirect lands on `redirect_uri`.
    #[must_use]
    pub fn new(provider: Provider, config: &TokenClientConfig, redirect_uri: impl Into<String>) -> Self {
        Self {
            provider,
            client_id: config.client_id.clone(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            scope: config.scope.clone(),
            prompt: config.prompt.clone(),
            state: random_token(16),
            pkce: PkceChallenge::generate(),
        }
    }

    /// Sends a client secret with the code exchange.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// The `state` value the redirect must echo.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// URL of the consent page.
    #[must_use]
    pub fn authorization_url(&self) -> Url {
        let mut url = self.provider.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scope)
            .append_pair("state", &self.state)
            .append_pair("code_challenge", self.pkce.challenge())
            .append_pair("code_challenge_method", PkceChallenge::METHOD)
            .extend_pairs(self.prompt.as_deref().map(|prompt| ("prompt", prompt)));
        url
    }

    /// Rejects a redirect whose `state` does not belong to this attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`] on a missing or foreign state.
    pub fn check_state(&self, returned: Option<&str>) -> Result<()> {
        if returned == Some(self.state.as_str()) {
            Ok(())
        } else {
            Err(Error::InvalidResponse("state mismatch on redirect".into()))
        }
    }

    /// Exchanges the authorization code at the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns the provider's error answer, or [`Error::Http`] if the
    /// endpoint cannot be reached.
    pub async fn exchange(&self, http: &Client, code: &str) -> Result<TokenResponse> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", self.pkce.verifier()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }

        debug!(endpoint = %self.provider.token_url, "Exchanging authorization code");
        let response = http
            .post(self.provider.token_url.clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await?;
        Err(serde_json::from_str::<ErrorResponse>(&body).map_or_else(
            |_| Error::provider("token_exchange_failed", status.to_string()),
            ErrorResponse::into_error,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request() -> ConsentRequest {
        ConsentRequest::new(
            Provider::google().unwrap(),
            &TokenClientConfig::gmail_readonly("client-1"),
            "http://127.0.0.1:8080",
        )
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_authorization_url() {
        let request = request();
        let url = request.authorization_url();
        let params = query(&url);

        assert!(url.as_str().starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert_eq!(params["client_id"], "client-1");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1:8080");
        assert_eq!(params["scope"], "https://www.googleapis.com/auth/gmail.readonly");
        assert_eq!(params["state"], request.state());
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["code_challenge"], request.pkce.challenge());
        assert_eq!(params["prompt"], "consent");
    }

    #[test]
    fn test_prompt_omitted_when_unset() {
        let mut config = TokenClientConfig::gmail_readonly("client-1");
        config.prompt = None;
        let request =
            ConsentRequest::new(Provider::google().unwrap(), &config, "http://127.0.0.1:1");
        assert!(!query(&request.authorization_url()).contains_key("prompt"));
    }

    #[test]
    fn test_attempts_are_distinct() {
        let (a, b) = (request(), request());
        assert_ne!(a.state(), b.state());
        assert_ne!(a.pkce.verifier(), b.pkce.verifier());
    }

    #[test]
    fn test_check_state() {
        let request = request();
        request.check_state(Some(request.state())).unwrap();
        assert!(request.check_state(None).is_err());
        assert!(request.check_state(Some("forged")).is_err());
    }
}
