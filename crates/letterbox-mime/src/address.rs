//! Mailbox parsing for `From`-style header values.

/// Placeholder used when a header carries no usable name.
const UNKNOWN_NAME: &str = "Unknown";

/// A display name and address pair parsed from a header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name (falls back to the address, then to `Unknown`).
    pub name: String,
    /// Address part; the whole header value when no angle brackets exist.
    pub address: String,
}

impl Mailbox {
    /// Parses a `Display Name <mailbox@host>` header value.
    ///
    /// Surrounding quotes on the display name are removed. Without an
    /// angle-bracket address, the trimmed value serves as both name and
    /// address.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        if let Some(open) = value.find('<')
            && let Some(len) = value[open + 1..].find('>')
            && len > 0
        {
            let address = value[open + 1..open + 1 + len].trim();
            let display = unquote(value[..open].trim());
            let name = [display, address]
                .into_iter()
                .find(|candidate| !candidate.is_empty())
                .unwrap_or(UNKNOWN_NAME);

            return Self {
                name: name.to_string(),
                address: address.to_string(),
            };
        }

        if value.is_empty() {
            return Self {
                name: UNKNOWN_NAME.to_string(),
                address: String::new(),
            };
        }

        Self {
            name: value.to_string(),
            address: value.to_string(),
        }
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map_or(text, str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_display_name() {
        let mailbox = Mailbox::parse("\"Jane Doe\" <jane@x.com>");
        assert_eq!(mailbox.name, "Jane Doe");
        assert_eq!(mailbox.address, "jane@x.com");
    }

    #[test]
    fn test_bare_display_name() {
        let mailbox = Mailbox::parse("Karl Architects <karl@bowery.example>");
        assert_eq!(mailbox.name, "Karl Architects");
        assert_eq!(mailbox.address, "karl@bowery.example");
    }

    #[test]
    fn test_address_only_in_brackets() {
        let mailbox = Mailbox::parse("<noreply@example.com>");
        assert_eq!(mailbox.name, "noreply@example.com");
        assert_eq!(mailbox.address, "noreply@example.com");
    }

    #[test]
    fn test_no_brackets() {
        let mailbox = Mailbox::parse("  mother@vermont.example ");
        assert_eq!(mailbox.name, "mother@vermont.example");
        assert_eq!(mailbox.address, "mother@vermont.example");
    }

    #[test]
    fn test_empty_header() {
        let mailbox = Mailbox::parse("");
        assert_eq!(mailbox.name, "Unknown");
        assert_eq!(mailbox.address, "");
    }

    #[test]
    fn test_empty_brackets_fall_back_to_whole_value() {
        let mailbox = Mailbox::parse("Someone <>");
        assert_eq!(mailbox.name, "Someone <>");
        assert_eq!(mailbox.address, "Someone <>");
    }
}
