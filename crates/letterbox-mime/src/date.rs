//! Date header parsing.

use chrono::{DateTime, FixedOffset};

/// Parses a mail `Date` header.
///
/// Accepts RFC 2822 dates, with or without a trailing zone comment such as
/// `(PDT)`, and RFC 3339 timestamps. Returns `None` for anything else.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = strip_comment(value.trim());
    if value.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

fn strip_comment(value: &str) -> &str {
    if value.ends_with(')')
        && let Some(open) = value.rfind('(')
    {
        return value[..open].trim_end();
    }
    value
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_rfc2822() {
        let date = parse_date("Tue, 14 Oct 2025 09:30:00 -0700").unwrap();
        assert_eq!(date.month(), 10);
        assert_eq!(date.day(), 14);
        assert_eq!(date.hour(), 9);
        assert_eq!(date.offset().local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn test_rfc2822_with_zone_comment() {
        let date = parse_date("Tue, 14 Oct 2025 09:30:00 -0700 (PDT)").unwrap();
        assert_eq!(date.day(), 14);
    }

    #[test]
    fn test_rfc3339() {
        let date = parse_date("2025-10-14T09:30:00Z").unwrap();
        assert_eq!(date.year(), 2025);
    }

    #[test]
    fn test_unparseable() {
        assert!(parse_date("sometime last week").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("(PDT)").is_none());
    }
}
