use strum_macros::Display;

use super::cursor::{Cursor, is_tag_boundary};
use super::token::Token;

/// Tokenizer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Trim whitespace around text chunks and drop the ones left empty.
    pub trim_text: bool,
    /// Elements whose content is passed through as text, never as markup.
    pub raw_text_elements: Vec<String>,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            trim_text: false,
            raw_text_elements: vec!["script".to_string(), "style".to_string()],
        }
    }
}

/// A raw slice of input produced by segmentation, before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Chunk<'a> {
    /// A comment, a tag candidate or a run of text.
    Markup(&'a str),
    /// Content of a raw-text element such as `<script>`.
    RawText(&'a str),
}

impl<'a> Chunk<'a> {
    /// The input slice.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        match self {
            Self::Markup(s) | Self::RawText(s) => s,
        }
    }

    /// Classify the chunk into a token.
    #[must_use]
    pub fn into_token(self) -> Token {
        match self {
            Self::Markup(chunk) => classify(chunk),
            Self::RawText(chunk) => Token::Text {
                data: chunk.to_string(),
            },
        }
    }
}

/// Two-pass tokenizer: segmentation into chunks, then classification of
/// each chunk into a [`Token`].
///
/// Tokenization never fails. Anything that is not a comment or a
/// well-formed tag comes out as text.
pub struct HTMLTokenizer {
    input: String,
    options: TokenizerOptions,
    token_stream: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input with default options.
    #[must_use]
    pub fn new(input: String) -> Self {
        Self {
            input,
            options: TokenizerOptions::default(),
            token_stream: Vec::new(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: TokenizerOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    /// Run the tokenizer to completion.
    ///
    /// Processes the input and populates the token stream.
    pub fn run(&mut self) {
        let tokens: Vec<Token> = self
            .split_chunks()
            .into_iter()
            .map(Chunk::into_token)
            .collect();
        self.token_stream = tokens;
    }

    /// Tokens produced by the last [`HTMLTokenizer::run`].
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.token_stream
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after run() to get the tokens for the parser.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Segmentation pass: split the input into raw chunks.
    #[must_use]
    pub fn split_chunks(&self) -> Vec<Chunk<'_>> {
        let mut cursor = Cursor::new(&self.input);
        let mut chunks = Vec::new();

        while !cursor.is_exhausted() {
            if cursor.matches_ahead("<!--") {
                chunks.push(Chunk::Markup(cursor.read_until("-->", true)));
            } else if let Some(name) = self.raw_text_element_at(&cursor) {
                split_raw_text(&mut cursor, name, &mut chunks);
            } else if cursor.matches_ahead("<") {
                chunks.push(Chunk::Markup(cursor.read_until(">", true)));
            } else {
                let text = cursor.read_until("<", false);
                let text = if self.options.trim_text {
                    text.trim()
                } else {
                    text
                };
                if !text.is_empty() {
                    chunks.push(Chunk::Markup(text));
                }
            }
        }
        chunks
    }

    /// Name of the raw-text element whose start tag begins at the cursor.
    ///
    /// The name must be followed by `>`, `/`, whitespace or end of input,
    /// so `<scripts>` is an ordinary tag.
    fn raw_text_element_at(&self, cursor: &Cursor<'_>) -> Option<&str> {
        self.options
            .raw_text_elements
            .iter()
            .map(String::as_str)
            .find(|name| {
                !name.is_empty()
                    && cursor.matches_ahead_ignore_ascii_case(&format!("<{name}"))
                    && cursor
                        .remaining()
                        .get(name.len() + 1..)
                        .is_some_and(|after| after.chars().next().is_none_or(is_tag_boundary))
            })
    }
}

/// Emit the start tag, the untouched content and the end tag of a
/// raw-text element. Empty pieces are dropped.
fn split_raw_text<'a>(cursor: &mut Cursor<'a>, name: &str, chunks: &mut Vec<Chunk<'a>>) {
    let start_tag = cursor.read_until(">", true);
    chunks.push(Chunk::Markup(start_tag));
    if start_tag.ends_with("/>") || !start_tag.ends_with('>') {
        return;
    }

    let content = cursor.read_until_end_tag(name);
    if !content.is_empty() {
        chunks.push(Chunk::RawText(content));
    }
    let end_tag = cursor.read_until(">", true);
    if !end_tag.is_empty() {
        chunks.push(Chunk::Markup(end_tag));
    }
}

/// Classification pass for a single markup chunk.
///
/// ```
/// use bramble_html::tokenizer::{classify, Token};
///
/// assert_eq!(
///     classify("</p>"),
///     Token::EndTag { name: "p".to_string() }
/// );
/// assert!(matches!(classify("<!DOCTYPE html>"), Token::Text { .. }));
/// ```
#[must_use]
pub fn classify(chunk: &str) -> Token {
    if is_comment(chunk) {
        return Token::Comment {
            data: chunk.to_string(),
        };
    }
    if chunk.starts_with("<!") {
        return text(chunk);
    }
    classify_tag(chunk).unwrap_or_else(|| text(chunk))
}

fn is_comment(chunk: &str) -> bool {
    chunk.len() >= "<!---->".len() && chunk.starts_with("<!--") && chunk.ends_with("-->")
}

fn text(chunk: &str) -> Token {
    Token::Text {
        data: chunk.to_string(),
    }
}

/// `None` unless the chunk has the `<...>` shape and a non-empty name.
fn classify_tag(chunk: &str) -> Option<Token> {
    let inner = chunk.strip_prefix('<')?.strip_suffix('>')?;

    if let Some(rest) = inner.strip_prefix('/') {
        let (name, _) = split_name(rest)?;
        return Some(Token::EndTag {
            name: name.to_string(),
        });
    }

    let (body, self_closing) = inner
        .strip_suffix('/')
        .map_or((inner, false), |body| (body, true));
    let (name, attributes) = split_name(body)?;
    let name = name.to_string();
    let attributes = attributes.trim_start().to_string();
    Some(if self_closing {
        Token::SelfClosingTag { name, attributes }
    } else {
        Token::StartTag { name, attributes }
    })
}

/// Split a tag body into its name and the rest. The name ends at the first
/// whitespace, `/` or `>`.
fn split_name(body: &str) -> Option<(&str, &str)> {
    let end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(body.len());
    if end == 0 {
        return None;
    }
    Some(body.split_at(end))
}
