//! HTML to plain text conversion.
//!
//! Produces the text content of an HTML fragment: markup is removed,
//! character references are decoded and the contents of `script` and
//! `style` elements are dropped. No whitespace is synthesized for block
//! elements.

/// Elements whose contents are never visible text.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Returns true if the text looks like it carries markup.
#[must_use]
pub fn contains_markup(text: &str) -> bool {
    text.contains('<')
}

/// Strips all tags from an HTML fragment, keeping only visible text.
///
/// A `<` that does not open a tag (for example `a < b`) is kept as text.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        text.push_str(&decode_entities(&rest[..start]));
        let after = &rest[start + 1..];

        if let Some(comment) = after.strip_prefix("!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        if !after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
        {
            text.push('<');
            rest = after;
            continue;
        }

        let Some(end) = after.find('>') else {
            // Unterminated tag swallows the remainder, as a browser would.
            rest = "";
            break;
        };

        let tag = &after[..end];
        rest = &after[end + 1..];

        if let Some(element) = raw_text_element(tag) {
            rest = skip_raw_text(rest, element);
        }
    }

    text.push_str(&decode_entities(rest));
    text
}

/// Returns the raw-text element name if `tag` opens one.
fn raw_text_element(tag: &str) -> Option<&'static str> {
    let name: String = tag
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    RAW_TEXT_ELEMENTS.into_iter().find(|element| *element == name)
}

/// Skips past the closing tag of a raw-text element.
fn skip_raw_text<'a>(rest: &'a str, element: &str) -> &'a str {
    let closing = format!("</{element}");
    let lower = rest.to_ascii_lowercase();
    lower.find(&closing).map_or("", |pos| {
        let tail = &rest[pos..];
        tail.find('>').map_or("", |end| &tail[end + 1..])
    })
}

/// Decodes named and numeric character references.
///
/// Unknown references are left untouched.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];

        let decoded = candidate
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&candidate[..semi]).map(|c| (c, semi)));

        if let Some((c, semi)) = decoded {
            out.push(c);
            rest = &candidate[semi + 1..];
        } else {
            out.push('&');
            rest = candidate;
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        "hellip" => Some('…'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "rsquo" => Some('’'),
        "lsquo" => Some('‘'),
        "rdquo" => Some('”'),
        "ldquo" => Some('“'),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strip_simple_markup() {
        assert_eq!(strip_tags("<p>Hello <b>there</b></p>"), "Hello there");
    }

    #[test]
    fn test_strip_keeps_line_breaks_in_text() {
        let html = "<div>Dear Mit,</div>\n\n<div>See you Sunday.</div>";
        assert_eq!(strip_tags(html), "Dear Mit,\n\nSee you Sunday.");
    }

    #[test]
    fn test_strip_attributes_and_self_closing() {
        let html = r#"<a href="https://example.com?a=1&b=2">link</a><br/>next"#;
        assert_eq!(strip_tags(html), "linknext");
    }

    #[test]
    fn test_strip_drops_script_and_style() {
        let html = "<style>p { color: red; }</style><p>Visible</p><SCRIPT>alert(1)</SCRIPT>!";
        assert_eq!(strip_tags(html), "Visible!");
    }

    #[test]
    fn test_strip_drops_comments() {
        assert_eq!(strip_tags("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn test_literal_less_than_is_text() {
        assert_eq!(strip_tags("1 < 2 and <i>3</i>"), "1 < 2 and 3");
    }

    #[test]
    fn test_unterminated_tag() {
        assert_eq!(strip_tags("before <span class="), "before ");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            strip_tags("<p>Fish &amp; Chips &lt;3 &#39;yes&#x27; &unknown;</p>"),
            "Fish & Chips <3 'yes' &unknown;"
        );
    }

    #[test]
    fn test_contains_markup() {
        assert!(contains_markup("<p>hi</p>"));
        assert!(!contains_markup("plain text"));
    }

    proptest! {
        #[test]
        fn stripping_plain_text_is_identity(text in "[a-zA-Z0-9 ,.\n]{0,64}") {
            prop_assert_eq!(strip_tags(&text), text);
        }

        #[test]
        fn stripped_output_has_no_tags(words in proptest::collection::vec("[a-z]{1,8}", 1..6)) {
            let html: String = words.iter().map(|w| format!("<span>{w}</span>")).collect();
            let text = strip_tags(&html);
            prop_assert!(!text.contains('<'));
            prop_assert_eq!(text, words.concat());
        }
    }
}
