//! Error types for payload decoding.

use std::string::FromUtf8Error;

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Body decoding failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Base64 input whose length no padding can fix.
    #[error("Base64 body of length {0} cannot be padded")]
    Truncated(usize),

    /// Characters outside the Base64 alphabets.
    #[error("Malformed Base64 body: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text.
    #[error("Body is not UTF-8: {0}")]
    Utf8Decode(#[from] FromUtf8Error),
}
