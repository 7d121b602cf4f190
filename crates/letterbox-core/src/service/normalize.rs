//! Normalization of Gmail messages into letters.
//!
//! Every function here is pure: the same message and the same `now` always
//! produce the same letter.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use letterbox_mime::{Mailbox, encoding, html, parse_date};

use super::message::{GmailMessage, MessagePart};
use crate::letter::{ACCENT_PALETTE, Letter, LetterId};

const NO_SUBJECT: &str = "(No Subject)";
const UNKNOWN_INITIALS: &str = "??";
const PREVIEW_CHARS: usize = 50;
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Converts a fetched message into a letter.
///
/// `index` is the message's position in the listing; it names letters whose
/// message carries no ID. Relative dates are computed against `now`.
#[must_use]
pub fn transform_message<Tz>(message: &GmailMessage, index: usize, now: &DateTime<Tz>) -> Letter
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mailbox = Mailbox::parse(message.header("From").unwrap_or_default());
    let subject = message
        .header("Subject")
        .filter(|subject| !subject.is_empty())
        .unwrap_or(NO_SUBJECT);
    let body = message.payload.as_ref().map(extract_body).unwrap_or_default();

    let id = message
        .id
        .clone()
        .unwrap_or_else(|| format!("gmail-{index}"));

    Letter {
        id: LetterId::new(id),
        read: !message.is_unread(),
        initials: derive_initials(&mailbox.name),
        accent_color: accent_color(&mailbox.address).to_string(),
        subject: subject.to_string(),
        display_date: format_display_date(message.header("Date"), now),
        preview_text: preview(&body),
        signature: signature(&body, &mailbox.name),
        body,
        sender_name: mailbox.name,
        sender_address: mailbox.address,
        external_message_id: message.id.clone(),
    }
}

/// First character of each word, uppercased, at most two characters.
#[must_use]
pub fn derive_initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
        .chars()
        .take(2)
        .collect();

    if initials.is_empty() {
        UNKNOWN_INITIALS.to_string()
    } else {
        initials
    }
}

/// Stamp color for a sender address.
#[must_use]
pub fn accent_color(address: &str) -> &'static str {
    let sum: u64 = address.encode_utf16().map(u64::from).sum();
    let len = ACCENT_PALETTE.len() as u64;
    #[allow(clippy::cast_possible_truncation)]
    let index = (sum % len) as usize;
    ACCENT_PALETTE[index]
}

/// Relative date label for a `Date` header value.
///
/// No header (or an empty one) means "Today", an unparseable one "Recent". Otherwise whole
/// days elapsed decide between "Today", "Yesterday" and a short
/// month-and-day in `now`'s time zone.
#[must_use]
pub fn format_display_date<Tz>(header: Option<&str>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(header) = header.filter(|value| !value.is_empty()) else {
        return "Today".to_string();
    };
    let Some(date) = parse_date(header) else {
        return "Recent".to_string();
    };

    let elapsed = now.timestamp_millis() - date.timestamp_millis();
    match elapsed.div_euclid(MILLIS_PER_DAY) {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        _ => date
            .with_timezone(&now.timezone())
            .format("%b %-d")
            .to_string(),
    }
}

/// Plain-text body of the first text part, in depth-first order.
#[must_use]
pub fn extract_body(root: &MessagePart) -> String {
    let mut pending = vec![root];
    let mut text = String::new();

    while let Some(part) = pending.pop() {
        if part.is_text()
            && let Some(data) = part.data()
        {
            // Undecodable data counts as an empty part.
            text = encoding::decode_base64url_text(data).unwrap_or_default();
            if !text.is_empty() {
                break;
            }
        }
        pending.extend(part.parts.iter().rev());
    }

    if html::contains_markup(&text) {
        text = html::strip_tags(&text);
    }
    text.trim().to_string()
}

/// Closed-envelope excerpt of a body.
#[must_use]
pub fn preview(body: &str) -> String {
    let mut preview: String = body
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    preview.push_str("...");
    preview
}

/// Last non-blank line of the body, or the sender's name.
#[must_use]
pub fn signature(body: &str, sender_name: &str) -> String {
    body.lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .unwrap_or(sender_name)
        .to_string()
}
