//! # letterbox-oauth
//!
//! `OAuth2` consent and token handling for read-only mailbox access.
//!
//! ## Features
//!
//! - **Token client**: one consent request in flight at a time, bounded by a
//!   timeout, fed by an asynchronous provider callback
//! - **Identity providers**: the [`IdentityProvider`] seam, with
//!   [`GoogleIdentity`] opening the system browser and receiving the redirect
//!   on a loopback listener
//! - **Consent requests**: PKCE-protected authorization URLs and code
//!   exchange
//! - **Provider configurations**: Google, either built in or loaded from the
//!   `OpenID` discovery document
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use letterbox_oauth::{GoogleIdentity, IdentityProvider, TokenClient, TokenClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let identity = Arc::new(GoogleIdentity::new());
//!     identity.load().await?;
//!
//!     let client = TokenClient::new(identity, TokenClientConfig::gmail_readonly("client-id"));
//!     let token = client.request_access().await?;
//!     println!("Access token: {}", token.access_token);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod flow;
pub mod identity;
pub mod provider;
pub mod token;

pub use error::{Error, Result};
pub use flow::{ConsentRequest, DEFAULT_CONSENT_TIMEOUT, PkceChallenge, TokenClient};
pub use identity::{GoogleIdentity, IdentityProvider, TokenCallback, TokenClientConfig, TokenReply};
pub use provider::{GMAIL_READONLY_SCOPE, Provider};
pub use token::Token;
