/// Forward-only scanner over the input text.
///
/// The cursor never fails: a pattern that does not occur degrades to
/// "read to end of input". An empty pattern matches at the current
/// position, so reading up to it consumes nothing.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Unread part of the input.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        self.input.get(self.position..).unwrap_or_default()
    }

    /// True once the whole input has been consumed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Next character without consuming it.
    #[must_use]
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Whether the unread input starts with `literal`.
    #[must_use]
    pub fn matches_ahead(&self, literal: &str) -> bool {
        self.remaining().starts_with(literal)
    }

    /// Whether the unread input starts with `literal`, ignoring ASCII case.
    #[must_use]
    pub fn matches_ahead_ignore_ascii_case(&self, literal: &str) -> bool {
        self.remaining()
            .as_bytes()
            .get(..literal.len())
            .is_some_and(|ahead| ahead.eq_ignore_ascii_case(literal.as_bytes()))
    }

    /// Read up to the next occurrence of `pattern` (or to the end of input).
    ///
    /// With `inclusive`, the pattern itself is part of the returned slice
    /// and is consumed as well.
    ///
    /// ```
    /// use bramble_html::tokenizer::Cursor;
    ///
    /// let mut cursor = Cursor::new("<b>bold</b>");
    /// assert_eq!(cursor.read_until(">", true), "<b>");
    /// assert_eq!(cursor.read_until("<", false), "bold");
    /// assert_eq!(cursor.read_until("nowhere", false), "</b>");
    /// assert!(cursor.is_exhausted());
    /// ```
    pub fn read_until(&mut self, pattern: &str, inclusive: bool) -> &'a str {
        let found = self.remaining().find(pattern);
        self.take_through(found, pattern.len(), inclusive)
    }

    /// [`Cursor::read_until`] with an ASCII case-insensitive search.
    pub fn read_until_ignore_ascii_case(&mut self, pattern: &str, inclusive: bool) -> &'a str {
        let found = find_ignore_ascii_case(self.remaining(), pattern);
        self.take_through(found, pattern.len(), inclusive)
    }

    /// Read up to the next end tag for `name` (or to the end of input).
    ///
    /// The name is matched ignoring ASCII case and must be followed by `>`,
    /// `/`, whitespace or end of input, so `</scripts>` does not end a
    /// `script` body.
    ///
    /// ```
    /// use bramble_html::tokenizer::Cursor;
    ///
    /// let mut cursor = Cursor::new("a</styles>b</STYLE>");
    /// assert_eq!(cursor.read_until_end_tag("style"), "a</styles>b");
    /// assert_eq!(cursor.remaining(), "</STYLE>");
    /// ```
    pub fn read_until_end_tag(&mut self, name: &str) -> &'a str {
        let rest = self.remaining();
        let needle = format!("</{name}");
        let mut from = 0;
        let mut found = None;
        while let Some(offset) = rest
            .get(from..)
            .and_then(|tail| find_ignore_ascii_case(tail, &needle))
        {
            let start = from + offset;
            let after = rest.get(start + needle.len()..).unwrap_or_default();
            if after.chars().next().is_none_or(is_tag_boundary) {
                found = Some(start);
                break;
            }
            // `<` is one byte, so this stays on a char boundary
            from = start + 1;
        }
        self.take_through(found, needle.len(), false)
    }

    fn take_through(&mut self, found: Option<usize>, pattern_len: usize, inclusive: bool) -> &'a str {
        let rest = self.remaining();
        let len = match found {
            Some(start) if inclusive => start + pattern_len,
            Some(start) => start,
            None => rest.len(),
        };
        let taken = rest.get(..len).unwrap_or(rest);
        self.position += taken.len();
        taken
    }
}

/// Characters that may follow a tag name.
pub(crate) fn is_tag_boundary(c: char) -> bool {
    c == '>' || c == '/' || c.is_ascii_whitespace()
}

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    let bytes = haystack.as_bytes();
    haystack.char_indices().map(|(i, _)| i).chain([haystack.len()]).find(|&i| {
        bytes
            .get(i..i + needle.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(needle))
    })
}
