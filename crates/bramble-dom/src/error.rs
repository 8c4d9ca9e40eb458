use thiserror::Error;

use crate::NodeId;

/// Invalid use of the tree mutation API.
///
/// Every fallible operation checks its preconditions before touching the
/// tree, so an `Err` means nothing was modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The id was never allocated by this tree, or its subtree was destroyed.
    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),

    /// The operation needs the node to have a parent.
    #[error("node {0} is not attached to a parent")]
    NotAttached(NodeId),

    /// Text and comment nodes cannot hold children.
    #[error("node {0} cannot have children")]
    CannotHaveChildren(NodeId),

    /// The operation only applies to elements.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// The operation only applies to text and comment nodes.
    #[error("node {0} is neither a text nor a comment node")]
    NotCharacterData(NodeId),

    /// The root can never be moved, detached or destroyed.
    #[error("the root node cannot be moved")]
    RootNotMovable,

    /// The move would make `node` its own ancestor.
    #[error("moving {node} under {parent} would make it its own ancestor")]
    WouldCreateCycle {
        /// The node being moved.
        node: NodeId,
        /// The parent it would be moved into.
        parent: NodeId,
    },

    /// The same node was listed twice in one insertion.
    #[error("node {0} appears more than once in the inserted nodes")]
    DuplicateNode(NodeId),

    /// A node cannot be inserted before, after or in place of itself.
    #[error("node {0} cannot be inserted relative to itself")]
    AnchorInNodes(NodeId),

    /// The operation needs a detached node.
    #[error("node {0} must be detached first")]
    StillAttached(NodeId),
}
