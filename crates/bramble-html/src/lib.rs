//! Forgiving HTML tokenizer and tree builder for bramble.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: two-pass segmentation and classification into text,
//!   comment, start, self-closing and end tag tokens. `script` and
//!   `style` content is passed through untouched.
//! - **Attribute parsing**: quoted, single-quoted, bare and boolean forms.
//! - **Tree builder**: a single insertion point with a recovery algorithm
//!   for end tags that do not match the open element.
//!
//! Malformed markup is never an error. Every input produces a tree in
//! which all elements are closed.
//!
//! # Not Implemented
//!
//! - Per-element insertion modes and implied end tags
//! - Character references and encoding sniffing

/// Attribute text parsing.
pub mod attributes;
/// Tree construction.
pub mod parser;
/// Input segmentation and token classification.
pub mod tokenizer;

use bramble_dom::DomTree;

pub use parser::{
    HTMLParser, IssueKind, ParseError, ParseIssue, ParserOptions, format_tree, print_tree,
};
pub use tokenizer::{HTMLTokenizer, Token, TokenizerOptions};

/// Parse a document with default options.
///
/// ```
/// let tree = bramble_html::parse_document("<p>Hello<b>world</p>");
/// assert_eq!(tree.to_html(tree.root()), "<p>Hello<b></b>world</p>");
/// ```
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    parse_document_with(html, ParserOptions::default()).0
}

/// Parse a document and return the recovered markup errors alongside the
/// tree.
#[must_use]
pub fn parse_document_with(html: &str, options: ParserOptions) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(html.to_string()).with_options(options.tokenizer_options());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens())
        .with_options(options)
        .run_with_issues()
}
