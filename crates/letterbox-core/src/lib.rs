//! # letterbox-core
//!
//! Core logic for Letterbox, a stack of letters you open, fold or burn.
//!
//! This crate provides:
//! - The **Letter** model and the built-in sample letters
//! - The **Letter Stack** controller: promote, open, archive, reset
//! - Derived display values (greeting, unread count)
//! - The **Gmail import adapter**: sign-in, inbox fetch and normalization
//!   of provider messages into letters

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod letter;
pub mod service;
pub mod stack;

pub use error::{Error, Result};
pub use letter::{ACCENT_PALETTE, Letter, LetterId, sample_letters};
pub use service::{
    ApiRequest, ApiResponse, GMAIL_API_BASE, GmailMessage, GmailService, MailTransport, Method,
    ReqwestTransport, transform_message,
};
pub use stack::{ArchiveMode, LetterStack, ResetError, Selection, greeting, summary_line, unread_count};
