//! Gmail import adapter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;
use futures::future::try_join_all;
use letterbox_oauth::{IdentityProvider, Token, TokenClient, TokenClientConfig};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use super::message::{GmailMessage, MessageList, UNREAD_LABEL};
use super::normalize::transform_message;
use super::transport::{ApiRequest, MailTransport};
use crate::error::{Error, Result};
use crate::letter::Letter;

struct State<P> {
    initialized: bool,
    token_client: Option<Arc<TokenClient<P>>>,
    token: Option<Token>,
}

/// Signs in to Gmail and imports inbox messages as letters.
///
/// Each instance owns its own sign-in state, so independent instances (for
/// example in tests) never observe each other's tokens.
pub struct GmailService<P, T> {
    identity: Arc<P>,
    transport: T,
    state: Mutex<State<P>>,
}

impl<P, T> std::fmt::Debug for GmailService<P, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("GmailService")
            .field("initialized", &state.initialized)
            .field("has_token_client", &state.token_client.is_some())
            .field("authenticated", &state.token.is_some())
            .finish_non_exhaustive()
    }
}

impl<P: IdentityProvider, T: MailTransport> GmailService<P, T> {
    /// Creates an adapter over an identity provider and an API transport.
    #[must_use]
    pub fn new(identity: Arc<P>, transport: T) -> Self {
        Self {
            identity,
            transport,
            state: Mutex::new(State {
                initialized: false,
                token_client: None,
                token: None,
            }),
        }
    }

    /// Loads the identity provider. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] if the provider cannot be loaded.
    pub async fn initialize(&self) -> Result<()> {
        if self.lock().initialized {
            return Ok(());
        }

        self.identity
            .load()
            .await
            .map_err(|e| Error::Initialization(e.to_string()))?;

        self.lock().initialized = true;
        debug!("Identity provider loaded");
        Ok(())
    }

    /// Returns true once [`initialize`](Self::initialize) has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Configures the token client for read-only mailbox access.
    ///
    /// Initializes the provider first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty client ID, or
    /// [`Error::Initialization`] if the provider cannot be loaded.
    pub async fn init_token_client(&self, client_id: &str) -> Result<()> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(Error::Config("Google client ID is empty".into()));
        }

        self.initialize().await?;

        let client = TokenClient::new(
            Arc::clone(&self.identity),
            TokenClientConfig::gmail_readonly(client_id),
        );
        self.lock().token_client = Some(Arc::new(client));
        debug!(client_id, "Token client configured");
        Ok(())
    }

    /// Runs interactive consent and stores the granted token.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] without a token client
    /// - [`Error::ConcurrentRequest`] while another request is pending
    /// - [`Error::Timeout`] if the user does not answer in time
    /// - [`Error::Auth`] if the provider reports an error
    pub async fn request_access(&self) -> Result<Token> {
        let client = self
            .lock()
            .token_client
            .clone()
            .ok_or(Error::NotInitialized)?;

        let token = client.request_access().await?;
        self.lock().token = Some(token.clone());
        info!("Signed in to Gmail");
        Ok(token)
    }

    /// Returns true while an access token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock()
            .token
            .as_ref()
            .is_some_and(|token| !token.access_token.is_empty())
    }

    /// The current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock()
            .token
            .as_ref()
            .map(|token| token.access_token.clone())
    }

    /// Revokes the token with the provider and forgets it.
    ///
    /// Revocation is best-effort; the local token is cleared either way.
    pub async fn revoke_access(&self) {
        let token = self.lock().token.take();
        let Some(token) = token else {
            return;
        };

        match self.identity.revoke(&token.access_token).await {
            Ok(()) => info!("Signed out of Gmail"),
            Err(e) => warn!(error = %e, "Token revocation failed"),
        }
    }

    /// Tears the adapter down, revoking any held token.
    pub async fn close(&self) {
        self.revoke_access().await;
        self.lock().token_client = None;
    }

    /// Fetches up to `max_results` inbox messages as letters, newest first.
    ///
    /// Details are requested concurrently; the listing order is kept. A
    /// single failed call fails the whole fetch.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthRequired`] without a token; no request is made
    /// - [`Error::TokenExpired`] if the provider rejects the token
    /// - [`Error::Fetch`] for network failures and error statuses
    /// - [`Error::Json`] for malformed responses
    pub async fn fetch_emails(&self, max_results: u32) -> Result<Vec<Letter>> {
        let list: MessageList = self
            .api_get(format!(
                "/users/me/messages?maxResults={max_results}&q=in:inbox"
            ))
            .await?;

        if list.messages.is_empty() {
            info!("Inbox is empty");
            return Ok(Vec::new());
        }

        let messages: Vec<GmailMessage> = try_join_all(
            list.messages
                .iter()
                .map(|message| self.api_get(format!("/users/me/messages/{}?format=full", message.id))),
        )
        .await?;

        let now = Local::now();
        let letters: Vec<Letter> = messages
            .iter()
            .enumerate()
            .map(|(index, message)| transform_message(message, index, &now))
            .collect();

        info!(count = letters.len(), "Imported messages");
        Ok(letters)
    }

    /// Removes the `UNREAD` label from a message.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_emails`](Self::fetch_emails).
    pub async fn mark_as_read(&self, message_id: &str) -> Result<()> {
        let token = self.current_token()?;
        let request = ApiRequest::post(
            format!("/users/me/messages/{message_id}/modify"),
            token,
            json!({ "removeLabelIds": [UNREAD_LABEL] }),
        );
        self.api_request(request).await.map(|_| ())
    }

    async fn api_get<R: DeserializeOwned>(&self, path: String) -> Result<R> {
        let token = self.current_token()?;
        let body = self.api_request(ApiRequest::get(path, token)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn api_request(&self, request: ApiRequest) -> Result<String> {
        let response = self.transport.send(request).await?;

        if response.status == 401 {
            self.lock().token = None;
            warn!("Access token rejected; signed out");
            return Err(Error::TokenExpired);
        }
        if !response.is_success() {
            return Err(Error::Fetch(format!(
                "Gmail API error: {} {}",
                response.status, response.reason
            )));
        }

        Ok(response.body)
    }

    /// The usable access token. A token past its expiry is dropped.
    fn current_token(&self) -> Result<String> {
        let mut state = self.lock();
        if state.token.as_ref().is_some_and(Token::is_expired) {
            state.token = None;
            warn!("Access token expired; signed out");
        }
        state
            .token
            .as_ref()
            .map(|token| token.access_token.clone())
            .filter(|token| !token.is_empty())
            .ok_or(Error::AuthRequired)
    }

    fn lock(&self) -> MutexGuard<'_, State<P>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
