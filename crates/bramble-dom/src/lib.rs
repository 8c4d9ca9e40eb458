//! Editable node tree for the bramble parser.
//!
//! This crate provides an arena-based tree holding the four node kinds the
//! parser produces: the synthetic root, elements, text and comments.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! A child's `parent` field is a plain index back-link, so moving a subtree
//! only rewrites indices and no reference cycle can keep nodes alive.
//! Ids are handed out by the arena's length and never reused, which makes
//! them stable identifiers for the lifetime of the tree.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use strum_macros::{Display, EnumString, IntoStaticStr};

mod error;
/// Summary statistics and text extraction over subtrees.
pub mod info;
mod mutation;
/// HTML serialization of subtrees.
pub mod serialize;

pub use error::DomError;
pub use info::TreeInfo;

/// Insertion-ordered map of attribute names to optional values.
///
/// A `None` value is a boolean attribute (`<input disabled>`).
pub type AttributesMap = IndexMap<String, Option<String>>;

/// A type-safe index into the node arena.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether an element's end has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ClosingMode {
    /// Start tag seen, end tag still pending. Only valid while the tree
    /// builder is consuming tokens for this subtree.
    Open,
    /// Start and end tag (or a forced close during recovery).
    Closed,
    /// Written as `<tag />`. Children, if any, are not serialized.
    SelfClosing,
}

/// A node in the arena.
///
/// Relationships are stored as indices, the `parent` link is non-owning.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,

    /// The node whose `children` contains this node. `None` for the root
    /// and for detached nodes.
    pub parent: Option<NodeId>,

    /// Children in document order. Always empty for text and comments.
    pub children: Vec<NodeId>,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// Synthetic container at the top of every tree.
    Root,
    /// A tag with its attributes.
    Element(ElementData),
    /// Character data, emitted verbatim.
    Text(String),
    /// A comment, stored with its `<!--` and `-->` delimiters.
    Comment(String),
}

impl NodeType {
    /// Whether nodes of this kind may hold children.
    #[must_use]
    pub const fn can_have_children(&self) -> bool {
        matches!(self, Self::Root | Self::Element(_))
    }
}

/// Element-specific data.
///
/// `id` and `class` are not kept in `attrs`: they are split on whitespace
/// into ordered, deduplicated sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Tag name as written in the source (case preserved).
    pub tag_name: String,
    /// Closing state.
    pub closing: ClosingMode,
    /// Values of the `id` attribute.
    pub ids: IndexSet<String>,
    /// Values of the `class` attribute.
    pub classes: IndexSet<String>,
    /// Every other attribute, in source order.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create an element with no attributes.
    #[must_use]
    pub fn new(tag_name: &str, closing: ClosingMode) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            closing,
            ids: IndexSet::new(),
            classes: IndexSet::new(),
            attrs: AttributesMap::new(),
        }
    }

    /// Create an element from a generic attribute map, moving `id` and
    /// `class` values into their sets.
    #[must_use]
    pub fn from_attributes(tag_name: &str, closing: ClosingMode, mut attrs: AttributesMap) -> Self {
        let ids = attrs
            .shift_remove("id")
            .flatten()
            .map(|v| split_tokens(&v))
            .unwrap_or_default();
        let classes = attrs
            .shift_remove("class")
            .flatten()
            .map(|v| split_tokens(&v))
            .unwrap_or_default();
        Self {
            tag_name: tag_name.to_string(),
            closing,
            ids,
            classes,
            attrs,
        }
    }

    /// Whether the tag name matches, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, tag_name: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag_name)
    }

    /// Whether the element carries `id`.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Whether the element carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Whether the element has the (non id/class) attribute `key`.
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attrs.contains_key(&key.to_ascii_lowercase())
    }

    /// Value of attribute `key`. `None` when missing or boolean.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attrs
            .get(&key.to_ascii_lowercase())
            .and_then(|v| v.as_deref())
    }
}

/// Split an attribute value on ASCII whitespace into an ordered set.
fn split_tokens(value: &str) -> IndexSet<String> {
    value.split_ascii_whitespace().map(str::to_string).collect()
}

/// Arena-based node tree with O(1) node access.
///
/// All nodes live in one vector; relationships are [`NodeId`] indices.
/// Slots of destroyed subtrees are emptied, never reused.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The root is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Option<Node>>,
}

impl DomTree {
    /// Create a new tree with just the root node.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            node_type: NodeType::Root,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![Some(root)],
        }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether `id` is the root node.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        id == NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Mutable access stays crate-private so the structure invariants can
    /// only change through the mutation API.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Get a node or report it as unknown.
    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::UnknownNode(id))
    }

    /// Number of ids handed out so far, including destroyed ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is created with the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of live (not destroyed) nodes, the root included.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Allocate a new detached node and return its ID.
    fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    /// Create a detached element with no attributes.
    pub fn create_element(&mut self, tag_name: &str, closing: ClosingMode) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name, closing)))
    }

    /// Create a detached element from prepared element data.
    pub fn create_element_from(&mut self, data: ElementData) -> NodeId {
        self.alloc(NodeType::Element(data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeType::Text(text.to_string()))
    }

    /// Create a detached comment node holding `<!--{body}-->`.
    ///
    /// ```
    /// use bramble_dom::DomTree;
    ///
    /// let mut tree = DomTree::new();
    /// let note = tree.create_comment("note");
    /// assert_eq!(tree.as_comment(note), Some("<!--note-->"));
    /// ```
    pub fn create_comment(&mut self, body: &str) -> NodeId {
        self.alloc(NodeType::Comment(wrap_comment(body)))
    }

    /// Create a detached comment node from complete comment markup, as
    /// captured by the tokenizer. `markup` is stored and serialized verbatim.
    pub fn create_comment_markup(&mut self, markup: &str) -> NodeId {
        self.alloc(NodeType::Comment(markup.to_string()))
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of `id` within its parent's children.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Check if `descendant` is a (strict) descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// The topmost ancestor of `id` (the root for attached nodes, the
    /// top of the detached subtree otherwise).
    #[must_use]
    pub fn top(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over all descendants of a node in document (pre-)order,
    /// excluding the node itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data, for in-place attribute edits.
    pub(crate) fn as_element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.get_mut(id).map(|n| &mut n.node_type) {
            Some(NodeType::Element(data)) => Ok(data),
            Some(_) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::UnknownNode(id)),
        }
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Get the comment markup if this node is a comment.
    #[must_use]
    pub fn as_comment(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Comment(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

pub(crate) fn wrap_comment(body: &str) -> String {
    format!("<!--{body}-->")
}
