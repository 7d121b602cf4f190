//! Consent flows.
//!
//! [`ConsentRequest`] covers one browser round trip: the authorization URL
//! and the code exchange. [`TokenClient`] sits on top of an
//! [`IdentityProvider`](crate::IdentityProvider) and serializes requests.

mod consent;
mod pkce;
mod token_client;

pub use consent::ConsentRequest;
pub use pkce::PkceChallenge;
pub use token_client::{DEFAULT_CONSENT_TIMEOUT, TokenClient};
