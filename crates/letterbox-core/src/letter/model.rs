//! Letter model types.

use serde::{Deserialize, Serialize};

/// Stamp colors. Imported letters pick one by hashing the sender address.
pub const ACCENT_PALETTE: [&str; 8] = [
    "#8B4513", "#2F4F4F", "#556B2F", "#800000", "#4B0082", "#006400", "#8B0000", "#2E8B57",
];

/// Unique identifier for a letter within the active stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LetterId(String);

impl LetterId {
    /// Create a new letter ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for LetterId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for LetterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LetterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LetterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// One piece of correspondence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Letter {
    /// Identity within the stack.
    pub id: LetterId,
    /// Whether the recipient has opened this letter.
    pub read: bool,
    /// Display name of the correspondent.
    pub sender_name: String,
    /// Postal-style or email origin line.
    pub sender_address: String,
    /// One or two uppercase characters for the stamp.
    pub initials: String,
    /// Stamp color.
    pub accent_color: String,
    /// Subject line.
    pub subject: String,
    /// Human readable date ("Today", "Yesterday", "Oct 14").
    pub display_date: String,
    /// Short excerpt shown while the envelope is closed.
    pub preview_text: String,
    /// Plain text body; paragraphs separated by a blank line.
    pub body: String,
    /// Closing line.
    pub signature: String,
    /// Provider message ID for imported letters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_message_id: Option<String>,
}

impl Letter {
    /// Iterates over the body's paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.body
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
    }

    /// Returns true if the letter came from a mail provider.
    #[must_use]
    pub const fn is_imported(&self) -> bool {
        self.external_message_id.is_some()
    }
}
