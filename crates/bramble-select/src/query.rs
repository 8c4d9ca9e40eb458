//! Running selectors against a tree.

use std::collections::HashSet;

use bramble_dom::{DomTree, NodeId};

use crate::selector::{Filter, Selector, SelectorError};

/// Selector queries on a [`DomTree`].
pub trait Select {
    /// Nodes below `from` (never `from` itself) matched by `selector`, in
    /// document order.
    ///
    /// `max_depth` bounds how many levels below `from` the first stage
    /// searches: `Some(1)` only looks at the children, `None` is unbounded.
    fn find(&self, from: NodeId, selector: &Selector, max_depth: Option<usize>) -> Vec<NodeId>;

    /// [`Select::find`] with selector text.
    ///
    /// # Errors
    ///
    /// Invalid selector syntax.
    fn select(
        &self,
        from: NodeId,
        selector: &str,
        max_depth: Option<usize>,
    ) -> Result<Vec<NodeId>, SelectorError>;

    /// Nearest ancestor of `node` matched by `selector`, looking at most
    /// `max_depth` levels up.
    fn find_ancestor(
        &self,
        node: NodeId,
        selector: &Selector,
        max_depth: Option<usize>,
    ) -> Option<NodeId>;

    /// [`Select::find_ancestor`] with selector text.
    ///
    /// # Errors
    ///
    /// Invalid selector syntax.
    fn select_ancestor(
        &self,
        node: NodeId,
        selector: &str,
        max_depth: Option<usize>,
    ) -> Result<Option<NodeId>, SelectorError>;

    /// Whether a search from the top of `node`'s tree would return `node`.
    fn matches(&self, node: NodeId, selector: &Selector) -> bool;
}

impl Select for DomTree {
    fn find(&self, from: NodeId, selector: &Selector, max_depth: Option<usize>) -> Vec<NodeId> {
        find_in(self, self.children(from), selector, max_depth)
    }

    fn select(
        &self,
        from: NodeId,
        selector: &str,
        max_depth: Option<usize>,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.find(from, &selector, max_depth))
    }

    fn find_ancestor(
        &self,
        node: NodeId,
        selector: &Selector,
        max_depth: Option<usize>,
    ) -> Option<NodeId> {
        self.ancestor(node, |tree, id| selector.matches(tree, id), max_depth)
    }

    fn select_ancestor(
        &self,
        node: NodeId,
        selector: &str,
        max_depth: Option<usize>,
    ) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.find_ancestor(node, &selector, max_depth))
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(self, node)
    }
}

/// Run `selector` over an explicit candidate set.
///
/// The first stage searches the candidates and their subtrees, `max_depth`
/// levels deep counting the candidates as level 1. Each following stage
/// searches the direct children of the previous matches, as deep as its
/// combinator allows. The result is deduplicated and in document order,
/// taking the candidates in the order given.
///
/// ```
/// use bramble_select::{Selector, find_in};
///
/// let tree = bramble_html::parse_document("<ul><li>a</li></ul><ol><li>b</li></ol>");
/// let lists = tree.children(tree.root());
/// let items = find_in(&tree, &lists[1..], &"li".parse::<Selector>().unwrap(), None);
/// assert_eq!(items.len(), 1);
/// assert_eq!(tree.text_content(items[0]), "b");
/// ```
#[must_use]
pub fn find_in(
    tree: &DomTree,
    candidates: &[NodeId],
    selector: &Selector,
    max_depth: Option<usize>,
) -> Vec<NodeId> {
    let mut stages = selector.stages().iter();
    let Some(first) = stages.next() else {
        return Vec::new();
    };

    let depth = tightest(max_depth, first.combinator.depth());
    let mut matched = search(tree, candidates, &first.filter, depth);
    for stage in stages {
        let children: Vec<NodeId> = matched
            .iter()
            .flat_map(|&id| tree.children(id).iter().copied())
            .collect();
        matched = search(tree, &children, &stage.filter, stage.combinator.depth());
    }
    document_order(tree, candidates, matched)
}

fn tightest(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Pre-order search over `candidates` and their subtrees, `depth` levels
/// deep. Each node is reported once.
fn search(
    tree: &DomTree,
    candidates: &[NodeId],
    filter: &Filter,
    depth: Option<usize>,
) -> Vec<NodeId> {
    if depth == Some(0) {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = candidates.iter().rev().map(|&id| (id, 1)).collect();

    while let Some((id, level)) = stack.pop() {
        if filter.matches(tree, id) && seen.insert(id) {
            found.push(id);
        }
        if depth.is_none_or(|max| level < max) {
            stack.extend(tree.children(id).iter().rev().map(|&child| (child, level + 1)));
        }
    }
    found
}

/// Order matches by a pre-order walk over the candidates' subtrees, which
/// every match lies in. The walk stops once all matches are placed.
fn document_order(tree: &DomTree, candidates: &[NodeId], matched: Vec<NodeId>) -> Vec<NodeId> {
    if matched.len() < 2 {
        return matched;
    }
    let mut wanted: HashSet<NodeId> = matched.into_iter().collect();
    let mut ordered = Vec::with_capacity(wanted.len());
    for &candidate in candidates {
        for id in std::iter::once(candidate).chain(tree.descendants(candidate)) {
            if wanted.remove(&id) {
                ordered.push(id);
                if wanted.is_empty() {
                    return ordered;
                }
            }
        }
    }
    ordered
}
