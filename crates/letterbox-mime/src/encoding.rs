//! Transport decoding for message bodies.
//!
//! Web mail APIs deliver part bodies as URL-safe Base64, frequently with the
//! trailing padding removed. Both alphabets are accepted here and missing
//! padding is restored before decoding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

/// Encodes data as URL-safe Base64 without padding.
#[must_use]
pub fn encode_base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes URL-safe Base64 data, correcting missing padding.
///
/// `-` and `_` are mapped onto the standard alphabet, so input in either
/// alphabet decodes.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64 after correction.
pub fn decode_base64url(data: &str) -> Result<Vec<u8>> {
    let mut standard: String = data
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match standard.len() % 4 {
        0 => {}
        1 => return Err(Error::Truncated(standard.len())),
        rem => standard.extend(std::iter::repeat_n('=', 4 - rem)),
    }

    STANDARD.decode(standard).map_err(Into::into)
}

/// Decodes URL-safe Base64 data into UTF-8 text.
///
/// # Errors
///
/// Returns an error if the data is not valid Base64 or the decoded bytes are
/// not valid UTF-8.
pub fn decode_base64url_text(data: &str) -> Result<String> {
    let bytes = decode_base64url(data)?;
    String::from_utf8(bytes).map_err(Into::into)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_unpadded() {
        let decoded = decode_base64url_text("SGVsbG8sIFdvcmxkIQ").unwrap();
        assert_eq!(decoded, "Hello, World!");
    }

    #[test]
    fn test_decode_already_padded() {
        let decoded = decode_base64url_text("SGVsbG8sIFdvcmxkIQ==").unwrap();
        assert_eq!(decoded, "Hello, World!");
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        // 0xfb 0xff encodes to "-_8" in the URL-safe alphabet.
        let decoded = decode_base64url("-_8").unwrap();
        assert_eq!(decoded, vec![0xfb, 0xff]);
    }

    #[test]
    fn test_decode_multibyte_utf8() {
        let encoded = encode_base64url("Café — déjà vu".as_bytes());
        let decoded = decode_base64url_text(&encoded).unwrap();
        assert_eq!(decoded, "Café — déjà vu");
    }

    #[test]
    fn test_decode_rejects_impossible_length() {
        assert!(matches!(
            decode_base64url("abcde"),
            Err(Error::Truncated(5))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let encoded = encode_base64url(&[0xff, 0xfe, 0xfd]);
        assert!(matches!(
            decode_base64url_text(&encoded),
            Err(Error::Utf8Decode(_))
        ));
    }
}
