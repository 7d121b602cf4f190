//! Identity provider abstraction.
//!
//! An identity provider runs the interactive part of sign-in. It is loaded
//! once, then asked for access tokens; each answer arrives asynchronously
//! through a callback, mirroring browser identity libraries.

mod google;
mod loopback;

pub use google::GoogleIdentity;

use crate::error::Result;
use crate::provider::GMAIL_READONLY_SCOPE;
use crate::token::{ErrorResponse, TokenResponse};
use std::future::Future;

/// Answer delivered to a [`TokenCallback`].
#[derive(Debug, Clone)]
pub enum TokenReply {
    /// The user granted access.
    Granted(TokenResponse),
    /// The provider reported an error code.
    Failed(ErrorResponse),
}

/// Callback invoked once with the outcome of a token request.
pub type TokenCallback = Box<dyn FnOnce(TokenReply) + Send + 'static>;

/// Configuration of a token requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClientConfig {
    /// Application client identifier.
    pub client_id: String,
    /// Space separated scopes.
    pub scope: String,
    /// `prompt` parameter sent with every request.
    pub prompt: Option<String>,
}

impl TokenClientConfig {
    /// Read-only Gmail access that always shows the consent screen.
    #[must_use]
    pub fn gmail_readonly(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            scope: GMAIL_READONLY_SCOPE.to_string(),
            prompt: Some("consent".to_string()),
        }
    }
}

/// A source of access tokens that requires user interaction.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Loads the provider. Must be idempotent.
    fn load(&self) -> impl Future<Output = Result<()>> + Send;

    /// Starts an interactive token request.
    ///
    /// Returns immediately; `callback` is invoked later with the outcome.
    /// A provider may never invoke it (e.g. the user walked away).
    fn request_access_token(&self, config: &TokenClientConfig, callback: TokenCallback);

    /// Revokes an access token with the provider.
    fn revoke(&self, access_token: &str) -> impl Future<Output = Result<()>> + Send;
}
