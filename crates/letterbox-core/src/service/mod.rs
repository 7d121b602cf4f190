//! Mail import service.
//!
//! This module bridges the letter stack with a Gmail account: signing in
//! through an [`IdentityProvider`](letterbox_oauth::IdentityProvider),
//! talking to the REST API through a [`MailTransport`], and normalizing
//! each message into a [`Letter`](crate::Letter).

mod gmail;
mod message;
pub mod normalize;
mod transport;

pub use gmail::GmailService;
pub use message::{GmailMessage, Header, MessageList, MessagePart, MessageRef, PartBody};
pub use normalize::transform_message;
pub use transport::{
    ApiRequest, ApiResponse, GMAIL_API_BASE, MailTransport, Method, ReqwestTransport,
};
