use indexmap::IndexMap;

use crate::{DomTree, NodeId, NodeType};

/// Counts gathered over a subtree by [`DomTree::info`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeInfo {
    /// Element count per tag name, in order of first appearance.
    pub tags: IndexMap<String, usize>,
    /// Total number of elements.
    pub elements: usize,
    /// Number of text nodes.
    pub text_nodes: usize,
    /// Summed byte length of all text payloads.
    pub text_length: usize,
    /// Summed byte length of all text payloads after trimming whitespace.
    pub text_trimmed_length: usize,
    /// Number of comment nodes.
    pub comments: usize,
    /// Summed byte length of all comments, delimiters included.
    pub comment_length: usize,
}

impl TreeInfo {
    fn record(&mut self, node_type: &NodeType) {
        match node_type {
            NodeType::Root => {}
            NodeType::Element(data) => {
                *self.tags.entry(data.tag_name.clone()).or_default() += 1;
                self.elements += 1;
            }
            NodeType::Text(text) => {
                self.text_nodes += 1;
                self.text_length += text.len();
                self.text_trimmed_length += text.trim().len();
            }
            NodeType::Comment(comment) => {
                self.comments += 1;
                self.comment_length += comment.len();
            }
        }
    }
}

impl DomTree {
    /// Concatenated text and comment payloads of `id` and its
    /// descendants, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|n| match &self.get(n)?.node_type {
                NodeType::Text(data) | NodeType::Comment(data) => Some(data.as_str()),
                NodeType::Root | NodeType::Element(_) => None,
            })
            .collect()
    }

    /// Statistics over `id` and its descendants.
    #[must_use]
    pub fn info(&self, id: NodeId) -> TreeInfo {
        let mut info = TreeInfo::default();
        for node in std::iter::once(id).chain(self.descendants(id)) {
            if let Some(node) = self.get(node) {
                info.record(&node.node_type);
            }
        }
        info
    }
}
