//! Google sign-in through the system browser.

use std::sync::Arc;

use reqwest::Client;
use tokio::net::TcpListener;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::loopback::receive_redirect;
use super::{IdentityProvider, TokenCallback, TokenClientConfig, TokenReply};
use crate::error::{Error, Result};
use crate::flow::{ConsentRequest, DEFAULT_CONSENT_TIMEOUT};
use crate::provider::{DiscoveryDocument, GOOGLE_DISCOVERY_URL, Provider};
use crate::token::{ErrorResponse, TokenResponse};

/// Google identity provider for desktop applications.
///
/// Loading fetches Google's `OpenID` discovery document. A token request
/// opens the consent page in the system browser, receives the redirect on
/// an ephemeral `127.0.0.1` port and exchanges the code (with PKCE) for an
/// access token.
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    discovery_url: String,
    client_secret: Option<String>,
    provider: OnceCell<Provider>,
}

impl Default for GoogleIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleIdentity {
    /// Creates a provider using Google's public discovery document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_discovery_url(GOOGLE_DISCOVERY_URL)
    }

    /// Creates a provider that loads its endpoints from another document.
    #[must_use]
    pub fn with_discovery_url(url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                discovery_url: url.into(),
                client_secret: None,
                provider: OnceCell::new(),
            }),
        }
    }

    /// Sets the client secret sent with the code exchange.
    ///
    /// Google issues secrets even for desktop clients; they are not
    /// confidential but the token endpoint expects them.
    #[must_use]
    pub fn with_client_secret(self, secret: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: self.inner.http.clone(),
                discovery_url: self.inner.discovery_url.clone(),
                client_secret: Some(secret.into()),
                provider: OnceCell::new(),
            }),
        }
    }

    /// Returns true once the discovery document has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.provider.initialized()
    }
}

impl Inner {
    async fn provider(&self) -> Result<&Provider> {
        self.provider
            .get_or_try_init(|| async {
                debug!(url = %self.discovery_url, "Loading identity discovery document");
                let response = self.http.get(&self.discovery_url).send().await?;
                if !response.status().is_success() {
                    return Err(Error::InvalidConfig(format!(
                        "discovery document returned {}",
                        response.status()
                    )));
                }
                let document: DiscoveryDocument = response.json().await?;
                let provider = Provider::from_discovery("Google", &document)?;
                provider.validate()?;
                Ok(provider)
            })
            .await
    }

    async fn consent(&self, config: &TokenClientConfig) -> Result<TokenResponse> {
        let provider = self.provider().await?.clone();

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());

        let mut request = ConsentRequest::new(provider, config, redirect_uri);
        if let Some(secret) = &self.client_secret {
            request = request.with_client_secret(secret);
        }
        let url = request.authorization_url();

        info!("Opening browser for Google consent");
        if let Err(e) = opener::open(url.as_str()) {
            warn!(error = %e, %url, "Could not open a browser; visit the URL manually");
        }

        let redirect = tokio::time::timeout(DEFAULT_CONSENT_TIMEOUT, receive_redirect(&listener))
            .await
            .map_err(|_| Error::Timeout(DEFAULT_CONSENT_TIMEOUT.as_secs()))??;

        request.check_state(redirect.state.as_deref())?;
        if let Some(error) = redirect.error {
            return Err(
                ErrorResponse::new(error, redirect.error_description.unwrap_or_default())
                    .into_error(),
            );
        }
        let code = redirect
            .code
            .ok_or_else(|| Error::InvalidResponse("redirect carried no code".into()))?;

        request.exchange(&self.http, &code).await
    }
}

impl IdentityProvider for GoogleIdentity {
    async fn load(&self) -> Result<()> {
        self.inner.provider().await.map(|_| ())
    }

    fn request_access_token(&self, config: &TokenClientConfig, callback: TokenCallback) {
        let inner = Arc::clone(&self.inner);
        let config = config.clone();

        tokio::spawn(async move {
            let reply = match inner.consent(&config).await {
                Ok(response) => TokenReply::Granted(response),
                Err(e) => {
                    warn!(error = %e, "Google consent failed");
                    TokenReply::Failed(ErrorResponse::from(&e))
                }
            };
            callback(reply);
        });
    }

    async fn revoke(&self, access_token: &str) -> Result<()> {
        let provider = self.inner.provider().await?;
        let Some(revocation_url) = provider.revocation_url.clone() else {
            return Err(Error::InvalidConfig(
                "provider does not advertise a revocation endpoint".into(),
            ));
        };

        let response = self
            .inner
            .http
            .post(revocation_url)
            .form(&[("token", access_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "revoke_failed",
                response.status().to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_loaded_initially() {
        let identity = GoogleIdentity::new();
        assert!(!identity.is_loaded());
    }

    #[test]
    fn test_load_failure_is_reported() {
        // Port 9 on loopback has no listener; the connection is refused.
        let identity = GoogleIdentity::with_discovery_url("http://127.0.0.1:9/discovery");
        let result = tokio_test::block_on(identity.load());
        assert!(result.is_err());
        assert!(!identity.is_loaded());
    }

    #[test]
    fn test_client_secret_keeps_discovery_url() {
        let identity = GoogleIdentity::with_discovery_url("http://127.0.0.1:9/discovery")
            .with_client_secret("secret");
        assert_eq!(identity.inner.discovery_url, "http://127.0.0.1:9/discovery");
        assert_eq!(identity.inner.client_secret.as_deref(), Some("secret"));
    }
}
