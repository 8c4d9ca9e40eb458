//! Attribute text parsing.
//!
//! The blob after a tag name is scanned left to right. At each position
//! one of these forms is tried, in priority order:
//!
//! 1. `key="value"`
//! 2. `key='value'`
//! 3. `key=bareword` (the bareword may be empty)
//! 4. `key`
//!
//! Characters that cannot start a key (stray quotes, `/`, `=`) are skipped.

use bramble_dom::AttributesMap;

/// Parse a raw attribute blob. Keys are folded to ASCII lowercase; a
/// repeated key keeps its first position and takes the last value.
///
/// ```
/// use bramble_html::attributes::parse_attributes;
///
/// let attrs = parse_attributes(r#"HREF="/a b" data-x='1' checked size=3"#);
/// assert_eq!(attrs.get("href"), Some(&Some("/a b".to_string())));
/// assert_eq!(attrs.get("data-x"), Some(&Some("1".to_string())));
/// assert_eq!(attrs.get("checked"), Some(&None));
/// assert_eq!(attrs.get("size"), Some(&Some("3".to_string())));
/// ```
#[must_use]
pub fn parse_attributes(blob: &str) -> AttributesMap {
    let mut attrs = AttributesMap::new();
    let mut rest = blob;

    while let Some(c) = rest.chars().next() {
        let key_len = rest.find(|c: char| !is_key_char(c)).unwrap_or(rest.len());
        if key_len == 0 {
            rest = &rest[c.len_utf8()..];
            continue;
        }
        let (key, after_key) = rest.split_at(key_len);
        let (value, after_value) = match after_key.strip_prefix('=') {
            Some(after_eq) => {
                let (value, after_value) = read_value(after_eq);
                (Some(value.to_string()), after_value)
            }
            None => (None, after_key),
        };
        let _ = attrs.insert(key.to_ascii_lowercase(), value);
        rest = after_value;
    }
    attrs
}

/// Read a quoted value, falling back to a (possibly empty) bareword when
/// the quote is not closed.
fn read_value(input: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(quoted) = input
            .strip_prefix(quote)
            .and_then(|body| body.split_once(quote))
        {
            return quoted;
        }
    }
    let end = input.find(|c: char| !is_bare_char(c)).unwrap_or(input.len());
    input.split_at(end)
}

fn is_key_char(c: char) -> bool {
    !(c.is_ascii_whitespace() || matches!(c, '=' | '\'' | '"' | '/'))
}

fn is_bare_char(c: char) -> bool {
    !(c.is_ascii_whitespace() || matches!(c, '\'' | '"' | '/'))
}
