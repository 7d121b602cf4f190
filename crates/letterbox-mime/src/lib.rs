//! # letterbox-mime
//!
//! Decoding helpers for message payloads returned by web mail APIs.
//!
//! ## Features
//!
//! - **Transport decoding**: URL-safe Base64 with padding correction
//! - **HTML to text**: tag stripping with entity decoding
//! - **Addresses**: `Display Name <mailbox@host>` parsing
//! - **Dates**: RFC 2822 date headers, including trailing zone comments
//!
//! ## Quick Start
//!
//! ```ignore
//! use letterbox_mime::{Mailbox, encoding, html};
//!
//! let mailbox = Mailbox::parse("\"Jane Doe\" <jane@example.com>");
//! assert_eq!(mailbox.name, "Jane Doe");
//!
//! let text = encoding::decode_base64url_text("SGVsbG8sIFdvcmxkIQ")?;
//! assert_eq!(text, "Hello, World!");
//!
//! let plain = html::strip_tags("<p>Hello <b>there</b></p>");
//! assert_eq!(plain, "Hello there");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod date;
mod error;

pub mod encoding;
pub mod html;

pub use address::Mailbox;
pub use date::parse_date;
pub use error::{Error, Result};
