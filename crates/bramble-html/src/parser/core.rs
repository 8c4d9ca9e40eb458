use std::fmt;

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

use bramble_common::warning::warn_once;
use bramble_dom::{ClosingMode, DomTree, ElementData, NodeId, NodeType};

use crate::attributes::parse_attributes;
use crate::tokenizer::{Token, TokenizerOptions};

/// Elements that never have content. Only consulted when
/// [`ParserOptions::void_elements`] is enabled.
pub const VOID_ELEMENTS: [&str; 16] = [
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Whether `tag_name` is one of [`VOID_ELEMENTS`], ignoring ASCII case.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag_name))
}

/// Tree builder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Trim whitespace around text and drop whitespace-only text.
    pub trim_text: bool,
    /// Elements whose content is kept as a single text node.
    pub raw_text_elements: Vec<String>,
    /// Build known void elements as self-closing and ignore their end tags.
    pub void_elements: bool,
    /// Stop consuming tokens at the first parse issue.
    pub strict: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        let tokenizer = TokenizerOptions::default();
        Self {
            trim_text: tokenizer.trim_text,
            raw_text_elements: tokenizer.raw_text_elements,
            void_elements: false,
            strict: false,
        }
    }
}

impl ParserOptions {
    /// The part of the configuration that drives the tokenizer.
    #[must_use]
    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            trim_text: self.trim_text,
            raw_text_elements: self.raw_text_elements.clone(),
        }
    }
}

/// What kind of markup error was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    /// An end tag with no open element of that name; everything open was
    /// closed at the root.
    UnmatchedEndTag,
    /// An element still open when an enclosing element closed; its
    /// content was moved up to the enclosing element.
    UnclosedElement,
    /// An element still open at end of input.
    UnclosedAtEof,
    /// An end tag for a void element, dropped.
    VoidEndTag,
}

/// A recovered markup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What happened.
    pub kind: IssueKind,
    /// Human readable description.
    pub message: String,
    /// Index into the token stream where this issue was encountered.
    pub token_index: usize,
    /// Tag name involved, as written.
    pub tag: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {}: {}", self.token_index, self.message)
    }
}

/// Error returned by [`HTMLParser::run_strict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("strict parse failed at {issue}")]
pub struct ParseError {
    /// The first issue encountered.
    pub issue: ParseIssue,
}

/// Builds a [`DomTree`] from a token stream.
///
/// The builder keeps a single insertion point. Start tags open a new
/// element there and descend into it; end tags are matched against the
/// insertion point and its ancestors, falling back to the root.
///
/// Building never fails: on completion every element is either
/// [`ClosingMode::Closed`] or [`ClosingMode::SelfClosing`].
pub struct HTMLParser {
    /// Tree being built. `NodeId::ROOT` is the synthetic root.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in token stream.
    token_index: usize,

    /// Where new nodes are appended.
    current: NodeId,

    options: ParserOptions,

    /// Recovered errors, in order.
    issues: Vec<ParseIssue>,

    /// Set in strict mode once an issue has been recorded.
    stopped: bool,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            current: NodeId::ROOT,
            options: ParserOptions::default(),
            issues: Vec::new(),
            stopped: false,
        }
    }

    /// Replace the options. Only the builder-side fields
    /// (`void_elements`, `strict`) matter once tokens exist.
    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Enable strict mode: stop at the first parse issue.
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Get all parse issues encountered so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the parser and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return both the tree and any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        self.build();
        (self.tree, self.issues)
    }

    /// Run in strict mode.
    ///
    /// # Errors
    ///
    /// Returns the first recovered markup error.
    pub fn run_strict(self) -> Result<DomTree, ParseError> {
        let (tree, issues) = self.with_strict_mode().run_with_issues();
        match issues.into_iter().next() {
            Some(issue) => Err(ParseError { issue }),
            None => Ok(tree),
        }
    }

    fn build(&mut self) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.iter().enumerate() {
            if self.stopped {
                break;
            }
            self.token_index = index;
            self.process_token(token);
        }
        self.token_index = tokens.len();
        self.tokens = tokens;
        self.close_all(true);
    }

    fn process_token(&mut self, token: &Token) {
        match token {
            Token::Text { data } => {
                let id = self.tree.create_text(data);
                self.insert(id);
            }
            Token::Comment { data } => {
                let id = self.tree.create_comment_markup(data);
                self.insert(id);
            }
            Token::SelfClosingTag { name, attributes } => {
                let id = self.create_element(name, attributes, ClosingMode::SelfClosing);
                self.insert(id);
            }
            Token::StartTag { name, attributes } => {
                if self.options.void_elements && is_void_element(name) {
                    let id = self.create_element(name, attributes, ClosingMode::SelfClosing);
                    self.insert(id);
                } else {
                    let id = self.create_element(name, attributes, ClosingMode::Open);
                    self.insert(id);
                    self.current = id;
                }
            }
            Token::EndTag { name } => {
                if self.options.void_elements && is_void_element(name) {
                    self.parse_issue(
                        IssueKind::VoidEndTag,
                        name,
                        &format!("ignored end tag </{name}> for void element"),
                    );
                } else {
                    self.close_element(name);
                }
            }
        }
    }

    fn create_element(&mut self, name: &str, attributes: &str, closing: ClosingMode) -> NodeId {
        let data = ElementData::from_attributes(name, closing, parse_attributes(attributes));
        self.tree.create_element_from(data)
    }

    /// Append a freshly created node at the insertion point.
    fn insert(&mut self, id: NodeId) {
        if let Err(err) = self.tree.append_child(self.current, id) {
            // The insertion point is always the root or an element.
            warn_once("HTML Parser", &format!("dropped node: {err}"));
        }
    }

    /// Handle an end tag.
    ///
    /// The matching element is the insertion point or its nearest ancestor
    /// with that tag name, or the root when there is none. Everything still
    /// open below it is flattened into its child list, then it is closed.
    fn close_element(&mut self, tag_name: &str) {
        let opening = if self.tag_matches(self.current, tag_name) {
            self.current
        } else {
            self.tree
                .ancestor(self.current, |tree, id| tag_matches(tree, id, tag_name), None)
                .unwrap_or(NodeId::ROOT)
        };

        if opening == NodeId::ROOT {
            self.parse_issue(
                IssueKind::UnmatchedEndTag,
                tag_name,
                &format!("unmatched end tag </{tag_name}>, closing everything"),
            );
        }

        let flattened = self.flatten_children(opening);
        if let Err(err) = self.tree.append_children(opening, &flattened) {
            warn_once("HTML Parser", &format!("lost children while closing: {err}"));
        }

        if opening == NodeId::ROOT {
            self.close_all(false);
            self.current = NodeId::ROOT;
        } else {
            self.set_closed(opening);
            self.current = self.tree.parent(opening).unwrap_or(NodeId::ROOT);
        }
    }

    /// Detach `node`'s children and return them depth-first, with the
    /// content of every still-open child spliced in right after it.
    ///
    /// Open children end up empty and are closed on the spot.
    fn flatten_children(&mut self, node: NodeId) -> Vec<NodeId> {
        let children = self.tree.clear_children(node).unwrap_or_default();
        let mut flattened = Vec::with_capacity(children.len());
        for child in children {
            flattened.push(child);
            if let Some(tag) = self.open_tag_name(child) {
                self.parse_issue(
                    IssueKind::UnclosedElement,
                    &tag,
                    &format!("unclosed <{tag}>, moving its content up"),
                );
                flattened.extend(self.flatten_children(child));
                self.set_closed(child);
            }
        }
        flattened
    }

    /// Force-close every element still open anywhere in the tree.
    fn close_all(&mut self, at_eof: bool) {
        let open: Vec<(NodeId, String)> = self
            .tree
            .descendants(NodeId::ROOT)
            .filter_map(|id| self.open_tag_name(id).map(|tag| (id, tag)))
            .collect();
        for (id, tag) in open {
            if at_eof {
                self.parse_issue(
                    IssueKind::UnclosedAtEof,
                    &tag,
                    &format!("unclosed <{tag}> at end of input"),
                );
            }
            self.set_closed(id);
        }
    }

    fn set_closed(&mut self, id: NodeId) {
        if let Err(err) = self.tree.set_closing(id, ClosingMode::Closed) {
            warn_once("HTML Parser", &format!("cannot close node: {err}"));
        }
    }

    fn open_tag_name(&self, id: NodeId) -> Option<String> {
        self.tree
            .as_element(id)
            .filter(|data| data.closing == ClosingMode::Open)
            .map(|data| data.tag_name.clone())
    }

    fn tag_matches(&self, id: NodeId, tag_name: &str) -> bool {
        tag_matches(&self.tree, id, tag_name)
    }

    /// Record a parse issue.
    ///
    /// Logs via bramble-common's warning system and stores the issue for
    /// later retrieval.
    fn parse_issue(&mut self, kind: IssueKind, tag: &str, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            kind,
            message: message.to_string(),
            token_index: self.token_index,
            tag: tag.to_string(),
        });
        if self.options.strict {
            self.stopped = true;
        }
    }
}

fn tag_matches(tree: &DomTree, id: NodeId, tag_name: &str) -> bool {
    tree.as_element(id).is_some_and(|data| data.is(tag_name))
}

/// Print an indented outline of the subtree at `id` to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_tree(tree, id, indent, &mut out);
    print!("{out}");
}

/// Indented outline of the subtree at `id`, one node per line.
///
/// Open elements carry a `?` marker and self-closing ones a `/`.
///
/// ```
/// use bramble_html::{format_tree, parse_document};
///
/// let tree = parse_document("<ul id=nav><li class=on>Home</li><br/></ul>");
/// assert_eq!(
///     format_tree(&tree, tree.root()),
///     "Root\n  <ul#nav>\n    <li.on>\n      \"Home\"\n    <br/>\n"
/// );
/// ```
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    out.push_str(&"  ".repeat(indent));
    match &node.node_type {
        NodeType::Root => out.push_str("Root"),
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            for id in &data.ids {
                out.push('#');
                out.push_str(id);
            }
            for class in &data.classes {
                out.push('.');
                out.push_str(class);
            }
            for (key, value) in &data.attrs {
                out.push(' ');
                out.push_str(key);
                if let Some(value) = value {
                    out.push_str(&format!("={value:?}"));
                }
            }
            match data.closing {
                ClosingMode::Open => out.push('?'),
                ClosingMode::SelfClosing => out.push('/'),
                ClosingMode::Closed => {}
            }
            out.push('>');
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n");
            out.push('"');
            out.push_str(&display);
            out.push('"');
        }
        NodeType::Comment(data) => out.push_str(data),
    }
    out.push('\n');
    for &child in &node.children {
        write_tree(tree, child, indent + 1, out);
    }
}
