//! HTML parser module for tree construction.

/// Tree builder and its recovery algorithm.
pub mod core;

pub use self::core::{
    HTMLParser, IssueKind, ParseError, ParseIssue, ParserOptions, VOID_ELEMENTS, format_tree,
    is_void_element, print_tree,
};
