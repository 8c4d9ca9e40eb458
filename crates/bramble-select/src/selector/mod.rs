//! Selector model and matching.
//!
//! A selector is a chain of [`Stage`]s read left to right. Each stage has
//! a [`Filter`] and the [`Combinator`] that links it to the stage before.
//! The last stage is the subject: the nodes a query returns.
//!
//! ```text
//! div.card > p
//! [Descendant: div.card] --> [Child: p]
//! ```

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use strum_macros::Display;

use bramble_dom::{DomTree, NodeId, NodeType};

mod parser;

pub use parser::SelectorError;

/// How a stage relates to the matches of the stage before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Combinator {
    /// Whitespace: any depth below the previous match.
    Descendant,
    /// `>`: a direct child of the previous match.
    Child,
}

impl Combinator {
    /// How many levels a search under this combinator may range over.
    /// `None` is unbounded; `Some(1)` only looks at the candidates.
    #[must_use]
    pub const fn depth(self) -> Option<usize> {
        match self {
            Self::Descendant => None,
            Self::Child => Some(1),
        }
    }
}

/// Which kinds of node a compound selector accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `**`: any node.
    AnyNode,
    /// `*`, or no tag written: any element.
    AnyElement,
    /// `$`: text nodes.
    Text,
    /// `%`: comment nodes.
    Comment,
    /// Elements with this tag name (ASCII case-insensitive).
    Tag(String),
}

/// A tag or wildcard followed by `.class` and `#id` filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Node kind or tag name.
    pub kind: NodeKind,
    /// Classes the element must all carry, lowercased.
    pub classes: Vec<String>,
    /// Ids the element must all carry, lowercased.
    pub ids: Vec<String>,
}

impl CompoundSelector {
    /// Whether `id` satisfies the kind, class and id conditions.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(node) = tree.get(id) else {
            return false;
        };
        if matches!(node.node_type, NodeType::Root) {
            return false;
        }
        let kind_ok = match (&self.kind, &node.node_type) {
            (NodeKind::AnyNode, _)
            | (NodeKind::AnyElement, NodeType::Element(_))
            | (NodeKind::Text, NodeType::Text(_))
            | (NodeKind::Comment, NodeType::Comment(_)) => true,
            (NodeKind::Tag(tag), NodeType::Element(data)) => data.is(tag),
            _ => false,
        };
        if !kind_ok {
            return false;
        }
        if self.classes.is_empty() && self.ids.is_empty() {
            return true;
        }
        tree.as_element(id).is_some_and(|data| {
            self.classes.iter().all(|c| contains_folded(&data.classes, c))
                && self.ids.iter().all(|i| contains_folded(&data.ids, i))
        })
    }
}

fn contains_folded<'a>(set: impl IntoIterator<Item = &'a String>, name: &str) -> bool {
    set.into_iter().any(|have| have.eq_ignore_ascii_case(name))
}

/// Programmatic node test usable in place of a compound selector.
pub type Predicate = Rc<dyn Fn(&DomTree, NodeId) -> bool>;

/// The test applied by one stage.
#[derive(Clone)]
pub enum Filter {
    /// Parsed from selector text.
    Compound(CompoundSelector),
    /// Arbitrary closure.
    Predicate(Predicate),
}

impl Filter {
    /// Whether `id` passes the filter. The root never does.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        if tree.is_root(id) {
            return false;
        }
        match self {
            Self::Compound(compound) => compound.matches(tree, id),
            Self::Predicate(predicate) => predicate(tree, id),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compound(compound) => f.debug_tuple("Compound").field(compound).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One link of a selector chain.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Relation to the previous stage. For the first stage, `Child` means
    /// only the search candidates themselves are considered.
    pub combinator: Combinator,
    /// Node test.
    pub filter: Filter,
}

/// A compiled selector.
#[derive(Debug, Clone)]
pub struct Selector {
    stages: Vec<Stage>,
}

impl Selector {
    /// Compile selector text.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] describing the first syntax problem.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        parser::parse(input).map(|stages| Self { stages })
    }

    /// A single-stage selector that accepts whatever `predicate` accepts.
    ///
    /// ```
    /// use bramble_select::{Select, Selector};
    ///
    /// let tree = bramble_html::parse_document("<p>a</p><p></p>");
    /// let non_empty = Selector::predicate(|tree, id| !tree.children(id).is_empty());
    /// assert_eq!(tree.find(tree.root(), &non_empty, None).len(), 1);
    /// ```
    #[must_use]
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&DomTree, NodeId) -> bool + 'static,
    {
        Self {
            stages: vec![Stage {
                combinator: Combinator::Descendant,
                filter: Filter::Predicate(Rc::new(predicate)),
            }],
        }
    }

    /// Extend the chain with a further stage to the right.
    #[must_use]
    pub fn then(mut self, combinator: Combinator, filter: Filter) -> Self {
        self.stages.push(Stage { combinator, filter });
        self
    }

    /// The stages, leftmost first.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The rightmost stage, whose matches are the query result.
    #[must_use]
    pub fn subject(&self) -> Option<&Stage> {
        self.stages.last()
    }

    /// Whether `id` matches the subject and its ancestors satisfy the rest
    /// of the chain, checked right to left through parents. Agrees with a
    /// search from the top of `id`'s tree, including a leading `>`.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(last) = self.stages.len().checked_sub(1) else {
            return false;
        };
        self.stages[last].filter.matches(tree, id) && self.matches_leftward(tree, last, id)
    }

    /// Stage `index` matched `id`; check the stages to its left.
    fn matches_leftward(&self, tree: &DomTree, index: usize, id: NodeId) -> bool {
        if index == 0 {
            // the first stage searches below the top of the tree
            return match self.stages[0].combinator {
                Combinator::Descendant => tree.parent(id).is_some(),
                Combinator::Child => tree.parent(id).is_some_and(|p| tree.parent(p).is_none()),
            };
        }
        let previous = &self.stages[index - 1];
        let accepts = |candidate: NodeId| {
            previous.filter.matches(tree, candidate)
                && self.matches_leftward(tree, index - 1, candidate)
        };
        match self.stages[index].combinator {
            Combinator::Child => tree.parent(id).is_some_and(accepts),
            Combinator::Descendant => tree.ancestors(id).any(accepts),
        }
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
