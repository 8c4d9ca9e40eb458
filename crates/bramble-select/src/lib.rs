//! Selector queries over bramble trees.
//!
//! The selector language is a small CSS subset:
//!
//! - a tag name, or a wildcard: `*` any element, `$` any text node,
//!   `%` any comment, `**` any node
//! - followed by any number of `.class` and `#id` filters
//! - compounds separated by whitespace (descendant) or `>` (child)
//!
//! Tag, class and id names all match ASCII case-insensitively.
//!
//! ```
//! use bramble_select::Select;
//!
//! let tree = bramble_html::parse_document(
//!     r#"<div class="card"><p>A</p><section><p>B</p></section></div>"#,
//! );
//! let found = tree.select(tree.root(), "div.card > p", None).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(tree.text_content(found[0]), "A");
//! ```

/// Running selectors against a tree.
pub mod query;
/// Selector model, compilation and matching.
pub mod selector;

pub use query::{Select, find_in};
pub use selector::{
    Combinator, CompoundSelector, Filter, NodeKind, Predicate, Selector, SelectorError, Stage,
};
