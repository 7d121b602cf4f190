//! Token client with a single pending-request slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identity::{IdentityProvider, TokenCallback, TokenClientConfig, TokenReply};
use crate::token::Token;

/// How long a consent request may wait for the provider's answer.
pub const DEFAULT_CONSENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default)]
struct PendingSlot {
    generation: u64,
    sender: Option<oneshot::Sender<TokenReply>>,
}

/// Requests access tokens from an [`IdentityProvider`].
///
/// At most one request is outstanding. A second call made while the first
/// is still waiting fails with [`Error::ConcurrentRequest`]. Every request
/// carries a generation number, so a late answer to a request that already
/// timed out is discarded instead of resolving a newer one.
#[derive(Debug)]
pub struct TokenClient<P> {
    provider: Arc<P>,
    config: TokenClientConfig,
    timeout: Duration,
    pending: Arc<Mutex<PendingSlot>>,
}

impl<P: IdentityProvider> TokenClient<P> {
    /// Creates a token client for the given configuration.
    #[must_use]
    pub fn new(provider: Arc<P>, config: TokenClientConfig) -> Self {
        Self {
            provider,
            config,
            timeout: DEFAULT_CONSENT_TIMEOUT,
            pending: Arc::default(),
        }
    }

    /// Overrides the consent timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns true while a request is waiting for its answer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        lock(&self.pending)
            .sender
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Asks the provider for an access token and waits for the answer.
    ///
    /// # Errors
    ///
    /// - [`Error::ConcurrentRequest`] if another request is still pending
    /// - [`Error::Timeout`] if no answer arrives within the timeout
    /// - [`Error::AccessDenied`] or [`Error::Provider`] if the provider reports an error
    /// - [`Error::InvalidResponse`] if the provider drops the request or grants an empty token
    pub async fn request_access(&self) -> Result<Token> {
        let (sender, receiver) = oneshot::channel();

        let generation = {
            let mut slot = lock(&self.pending);
            if slot.sender.as_ref().is_some_and(|s| !s.is_closed()) {
                return Err(Error::ConcurrentRequest);
            }
            slot.generation += 1;
            slot.sender = Some(sender);
            slot.generation
        };

        let pending = Arc::clone(&self.pending);
        let callback: TokenCallback = Box::new(move |reply| {
            let sender = {
                let mut slot = lock(&pending);
                if slot.generation == generation {
                    slot.sender.take()
                } else {
                    None
                }
            };
            match sender {
                Some(sender) => {
                    let _ = sender.send(reply);
                }
                None => debug!(generation, "Discarding answer to a superseded consent request"),
            }
        });

        debug!(generation, client_id = %self.config.client_id, "Requesting access token");
        self.provider.request_access_token(&self.config, callback);

        match tokio::time::timeout(self.timeout, receiver).await {
            Err(_) => {
                self.abandon(generation);
                Err(Error::Timeout(self.timeout.as_secs()))
            }
            Ok(Err(_)) => Err(Error::InvalidResponse(
                "identity provider dropped the consent request".into(),
            )),
            Ok(Ok(TokenReply::Granted(response))) => Token::from_response(response),
            Ok(Ok(TokenReply::Failed(error))) => Err(error.into_error()),
        }
    }

    fn abandon(&self, generation: u64) {
        let mut slot = lock(&self.pending);
        if slot.generation == generation {
            slot.sender = None;
        }
    }
}

fn lock(pending: &Mutex<PendingSlot>) -> MutexGuard<'_, PendingSlot> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::token::{ErrorResponse, TokenResponse};

    /// Provider that parks callbacks so tests decide when and how to answer.
    #[derive(Default)]
    struct ParkedProvider {
        callbacks: Mutex<Vec<TokenCallback>>,
    }

    impl ParkedProvider {
        fn answer(&self, index: usize, reply: TokenReply) {
            let callback = self.callbacks.lock().unwrap().remove(index);
            callback(reply);
        }

        fn parked(&self) -> usize {
            self.callbacks.lock().unwrap().len()
        }
    }

    impl IdentityProvider for ParkedProvider {
        async fn load(&self) -> Result<()> {
            Ok(())
        }

        fn request_access_token(&self, _config: &TokenClientConfig, callback: TokenCallback) {
            self.callbacks.lock().unwrap().push(callback);
        }

        async fn revoke(&self, _access_token: &str) -> Result<()> {
            Ok(())
        }
    }

    /// Provider that answers synchronously from inside the request call.
    struct ImmediateProvider(TokenReply);

    impl IdentityProvider for ImmediateProvider {
        async fn load(&self) -> Result<()> {
            Ok(())
        }

        fn request_access_token(&self, _config: &TokenClientConfig, callback: TokenCallback) {
            callback(self.0.clone());
        }

        async fn revoke(&self, _access_token: &str) -> Result<()> {
            Ok(())
        }
    }

    fn client<P: IdentityProvider>(provider: P) -> TokenClient<P> {
        TokenClient::new(Arc::new(provider), TokenClientConfig::gmail_readonly("client-1"))
    }

    #[tokio::test]
    async fn test_granted_token() {
        let client = client(ImmediateProvider(TokenReply::Granted(TokenResponse::bearer(
            "ya29.abc",
        ))));
        let token = client.request_access().await.unwrap();
        assert_eq!(token.access_token, "ya29.abc");
        assert!(!client.is_pending());
    }

    #[tokio::test]
    async fn test_provider_error() {
        let client = client(ImmediateProvider(TokenReply::Failed(ErrorResponse::new(
            "popup_closed",
            "",
        ))));
        let err = client.request_access().await.unwrap_err();
        assert!(matches!(err, Error::Provider { ref code, .. } if code == "popup_closed"));
    }

    #[tokio::test]
    async fn test_access_denied() {
        let client = client(ImmediateProvider(TokenReply::Failed(ErrorResponse::new(
            "access_denied",
            "",
        ))));
        assert!(matches!(
            client.request_access().await,
            Err(Error::AccessDenied)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_thirty_seconds() {
        let client = client(ParkedProvider::default());
        let err = client.request_access().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(30)));
        assert!(!client.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_request_rejected() {
        let client = Arc::new(client(ParkedProvider::default()));

        let first = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.request_access().await }
        });
        tokio::task::yield_now().await;
        assert!(client.is_pending());

        let second = client.request_access().await;
        assert!(matches!(second, Err(Error::ConcurrentRequest)));

        client
            .provider
            .answer(0, TokenReply::Granted(TokenResponse::bearer("first")));
        let token = first.await.unwrap().unwrap();
        assert_eq!(token.access_token, "first");
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_answer_does_not_resolve_newer_request() {
        let client = Arc::new(client(ParkedProvider::default()));

        assert!(matches!(
            client.request_access().await,
            Err(Error::Timeout(_))
        ));

        let second = tokio::spawn({
            let client = Arc::clone(&client);
            async move { client.request_access().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(client.provider.parked(), 2);

        // Stale answer for the timed out request.
        client
            .provider
            .answer(0, TokenReply::Granted(TokenResponse::bearer("stale")));
        assert!(client.is_pending());

        client
            .provider
            .answer(0, TokenReply::Granted(TokenResponse::bearer("fresh")));
        let token = second.await.unwrap().unwrap();
        assert_eq!(token.access_token, "fresh");
    }

    #[tokio::test]
    async fn test_dropped_callback() {
        struct Forgetful;

        impl IdentityProvider for Forgetful {
            async fn load(&self) -> Result<()> {
                Ok(())
            }

            fn request_access_token(&self, _config: &TokenClientConfig, callback: TokenCallback) {
                drop(callback);
            }

            async fn revoke(&self, _access_token: &str) -> Result<()> {
                Ok(())
            }
        }

        // The callback owns no sender, so the receiver stays open until the
        // timeout; use a short one.
        let client = client(Forgetful).with_timeout(Duration::from_millis(10));
        assert!(matches!(
            client.request_access().await,
            Err(Error::Timeout(0))
        ));
    }
}
