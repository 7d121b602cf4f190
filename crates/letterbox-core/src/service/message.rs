//! Gmail API resource shapes.
//!
//! Only the fields the import reads are modeled; everything is optional
//! because the API omits empty fields.

use serde::{Deserialize, Serialize};

/// Label carried by unread messages.
pub(crate) const UNREAD_LABEL: &str = "UNREAD";

/// Answer of `users.messages.list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    /// Message references, newest first. Absent for an empty inbox.
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    /// Token for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Estimated total number of results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_size_estimate: Option<u32>,
}

/// A message reference from a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    /// Message ID.
    pub id: String,
    /// Thread ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// A message fetched with `format=full`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    /// Message ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Thread ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Labels; `None` when the field was absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<String>>,
    /// Short plain-text excerpt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Root MIME part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<MessagePart>,
}

impl GmailMessage {
    /// Looks up a top-level header by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload.as_ref()?.header(name)
    }

    /// Returns true if the message carries the `UNREAD` label.
    #[must_use]
    pub fn is_unread(&self) -> bool {
        self.label_ids
            .as_ref()
            .is_some_and(|labels| labels.iter().any(|label| label == UNREAD_LABEL))
    }
}

/// One node of the MIME tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    /// Part ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    /// MIME type, e.g. `text/plain`.
    #[serde(default)]
    pub mime_type: String,
    /// Attachment filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Headers of this part.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Inline body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PartBody>,
    /// Child parts.
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl MessagePart {
    /// Looks up a header by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }

    /// Inline data, if present and non-empty.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.data.as_deref())
            .filter(|data| !data.is_empty())
    }

    /// Returns true for `text/plain` and `text/html` parts.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("text/plain")
            || self.mime_type.eq_ignore_ascii_case("text/html")
    }
}

/// A message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Body of a part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// URL-safe Base64 data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Attachment ID for bodies stored separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_message() {
        let json = r#"{
            "id": "18c2f",
            "threadId": "18c2f",
            "labelIds": ["INBOX", "UNREAD"],
            "snippet": "Hi",
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [{"name": "FROM", "value": "a@b.c"}],
                "body": {"size": 0},
                "parts": [
                    {"partId": "0", "mimeType": "text/plain", "body": {"size": 2, "data": "SGk"}}
                ]
            }
        }"#;
        let message: GmailMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.id.as_deref(), Some("18c2f"));
        assert!(message.is_unread());
        assert_eq!(message.header("from"), Some("a@b.c"));
        assert_eq!(message.header("Subject"), None);

        let payload = message.payload.unwrap();
        assert!(payload.data().is_none());
        assert_eq!(payload.parts[0].data(), Some("SGk"));
        assert!(payload.parts[0].is_text());
    }

    #[test]
    fn test_parse_empty_listing() {
        let list: MessageList = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(list.messages.is_empty());
    }

    #[test]
    fn test_missing_labels_is_not_unread() {
        let message: GmailMessage = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(message.label_ids.is_none());
        assert!(!message.is_unread());
    }
}
