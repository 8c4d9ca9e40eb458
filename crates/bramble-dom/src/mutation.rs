//! Tree mutation API.
//!
//! Every operation validates all of its preconditions first and only then
//! rewrites parent/children links, so a failed call leaves the tree as it
//! was. Node ids never change across any mutation.

use std::collections::HashSet;

use crate::{
    AttributesMap, ClosingMode, DomError, DomTree, ElementData, NodeId, NodeType, wrap_comment,
};

// =============================================================================
// Validation and raw link helpers
// =============================================================================

impl DomTree {
    /// `parent` must exist and be able to hold children.
    fn check_container(&self, parent: NodeId) -> Result<(), DomError> {
        if self.node(parent)?.node_type.can_have_children() {
            Ok(())
        } else {
            Err(DomError::CannotHaveChildren(parent))
        }
    }

    /// `nodes` may be moved under `parent` (optionally next to `anchor`).
    fn check_movable(
        &self,
        parent: NodeId,
        nodes: &[NodeId],
        anchor: Option<NodeId>,
    ) -> Result<(), DomError> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for &node in nodes {
            let _ = self.node(node)?;
            if node == NodeId::ROOT {
                return Err(DomError::RootNotMovable);
            }
            if Some(node) == anchor {
                return Err(DomError::AnchorInNodes(node));
            }
            if !seen.insert(node) {
                return Err(DomError::DuplicateNode(node));
            }
            if node == parent || self.is_descendant_of(parent, node) {
                return Err(DomError::WouldCreateCycle { node, parent });
            }
        }
        Ok(())
    }

    /// The parent of an attached node.
    fn attached_parent(&self, node: NodeId) -> Result<NodeId, DomError> {
        self.node(node)?.parent.ok_or(DomError::NotAttached(node))
    }

    /// Remove `node` from its parent's children (by identity) and clear
    /// its parent link. No-op for detached nodes.
    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = None;
        }
    }

    /// Splice already-detached `nodes` into `parent` at `index`.
    fn link_at(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) {
        for &node in nodes {
            if let Some(n) = self.get_mut(node) {
                n.parent = Some(parent);
            }
        }
        if let Some(p) = self.get_mut(parent) {
            let index = index.min(p.children.len());
            let tail = p.children.split_off(index);
            p.children.extend_from_slice(nodes);
            p.children.extend(tail);
        }
    }
}

// =============================================================================
// Structural operations
// =============================================================================

impl DomTree {
    /// Append `node` as the last child of `parent`.
    ///
    /// If `node` is attached somewhere it is moved, never shared.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown, `parent` cannot hold children, `node`
    /// is the root, or `node` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.append_children(parent, &[node])
    }

    /// Append `nodes` to `parent`, preserving their relative order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DomTree::append_child`], plus
    /// [`DomError::DuplicateNode`] when a node is listed twice.
    pub fn append_children(&mut self, parent: NodeId, nodes: &[NodeId]) -> Result<(), DomError> {
        self.check_container(parent)?;
        self.check_movable(parent, nodes, None)?;
        for &node in nodes {
            self.unlink(node);
        }
        let end = self.children(parent).len();
        self.link_at(parent, end, nodes);
        Ok(())
    }

    /// Remove `node` from its parent. The subtree below `node` stays intact.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAttached`] if `node` has no parent.
    pub fn detach(&mut self, node: NodeId) -> Result<NodeId, DomError> {
        let _ = self.attached_parent(node)?;
        self.unlink(node);
        Ok(node)
    }

    /// Insert `nodes` immediately before `anchor`.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAttached`] if `anchor` has no parent, or any of the
    /// [`DomTree::append_children`] conditions for the anchor's parent.
    pub fn insert_before(&mut self, anchor: NodeId, nodes: &[NodeId]) -> Result<(), DomError> {
        self.insert_relative(anchor, nodes, false)
    }

    /// Insert `nodes` immediately after `anchor`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DomTree::insert_before`].
    pub fn insert_after(&mut self, anchor: NodeId, nodes: &[NodeId]) -> Result<(), DomError> {
        self.insert_relative(anchor, nodes, true)
    }

    fn insert_relative(
        &mut self,
        anchor: NodeId,
        nodes: &[NodeId],
        after: bool,
    ) -> Result<(), DomError> {
        let parent = self.attached_parent(anchor)?;
        self.check_movable(parent, nodes, Some(anchor))?;
        for &node in nodes {
            self.unlink(node);
        }
        // Index is taken after the unlinks: moving earlier siblings shifts it.
        let index = self
            .index_in_parent(anchor)
            .map_or(0, |i| i + usize::from(after));
        self.link_at(parent, index, nodes);
        Ok(())
    }

    /// Put `nodes` in `anchor`'s place and detach `anchor`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DomTree::insert_before`].
    pub fn replace_child(&mut self, anchor: NodeId, nodes: &[NodeId]) -> Result<(), DomError> {
        let parent = self.attached_parent(anchor)?;
        self.check_movable(parent, nodes, Some(anchor))?;
        for &node in nodes {
            self.unlink(node);
        }
        let index = self.index_in_parent(anchor).unwrap_or_default();
        self.unlink(anchor);
        self.link_at(parent, index, nodes);
        Ok(())
    }

    /// Replace `node` by its own children, in order, then detach it.
    ///
    /// Afterwards `node` is detached and childless.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAttached`] if `node` has no parent.
    pub fn replace_with_children(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self.attached_parent(node)?;
        let index = self.index_in_parent(node).unwrap_or_default();
        let children = self
            .get_mut(node)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        self.unlink(node);
        self.link_at(parent, index, &children);
        Ok(())
    }

    /// Wrap `node` in a new closed element: the wrapper takes `node`'s
    /// slot and `node` becomes its only child. Returns the wrapper.
    ///
    /// `id` and `class` entries of `attrs` go to the wrapper's id/class sets.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAttached`] if `node` has no parent.
    pub fn wrap(
        &mut self,
        node: NodeId,
        tag_name: &str,
        attrs: AttributesMap,
    ) -> Result<NodeId, DomError> {
        let _ = self.attached_parent(node)?;
        let wrapper = self.create_element_from(ElementData::from_attributes(
            tag_name,
            ClosingMode::Closed,
            attrs,
        ));
        self.replace_child(node, &[wrapper])?;
        self.append_child(wrapper, node)?;
        Ok(wrapper)
    }

    /// [`DomTree::wrap`] every node of a collection, each in its own wrapper.
    ///
    /// # Errors
    ///
    /// Fails before wrapping anything if some node is unknown or detached.
    pub fn wrap_all(
        &mut self,
        nodes: &[NodeId],
        tag_name: &str,
        attrs: &AttributesMap,
    ) -> Result<Vec<NodeId>, DomError> {
        for &node in nodes {
            let _ = self.attached_parent(node)?;
        }
        nodes
            .iter()
            .map(|&node| self.wrap(node, tag_name, attrs.clone()))
            .collect()
    }

    /// [`DomTree::detach`] every node of a collection.
    ///
    /// # Errors
    ///
    /// Fails before detaching anything if some node is unknown, detached,
    /// or listed twice.
    pub fn detach_all(&mut self, nodes: &[NodeId]) -> Result<(), DomError> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for &node in nodes {
            let _ = self.attached_parent(node)?;
            if !seen.insert(node) {
                return Err(DomError::DuplicateNode(node));
            }
        }
        for &node in nodes {
            self.unlink(node);
        }
        Ok(())
    }

    /// Detach and return all children of `node`, in order.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `node` does not exist.
    pub fn clear_children(&mut self, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        let _ = self.node(node)?;
        let children = self
            .get_mut(node)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for &child in &children {
            if let Some(c) = self.get_mut(child) {
                c.parent = None;
            }
        }
        Ok(children)
    }

    /// Free a detached subtree. Its ids become unknown to the tree.
    ///
    /// # Errors
    ///
    /// [`DomError::StillAttached`] if `node` has a parent,
    /// [`DomError::RootNotMovable`] for the root.
    pub fn destroy(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == NodeId::ROOT {
            return Err(DomError::RootNotMovable);
        }
        if self.node(node)?.parent.is_some() {
            return Err(DomError::StillAttached(node));
        }
        let doomed: Vec<NodeId> = std::iter::once(node).chain(self.descendants(node)).collect();
        for id in doomed {
            if let Some(slot) = self.nodes.get_mut(id.0) {
                *slot = None;
            }
        }
        Ok(())
    }

    /// Walk up from `node`'s parent and return the first ancestor accepted
    /// by `predicate`.
    ///
    /// `max_depth` bounds the number of steps: `None` is unbounded,
    /// `Some(0)` never ascends, `Some(1)` only looks at the parent.
    pub fn ancestor<F>(
        &self,
        node: NodeId,
        mut predicate: F,
        max_depth: Option<usize>,
    ) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        self.ancestors(node)
            .take(max_depth.unwrap_or(usize::MAX))
            .find(|&id| predicate(self, id))
    }
}

// =============================================================================
// Node editing
// =============================================================================

impl DomTree {
    /// Change an element's closing mode.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn set_closing(&mut self, node: NodeId, closing: ClosingMode) -> Result<(), DomError> {
        self.as_element_mut(node)?.closing = closing;
        Ok(())
    }

    /// Rename an element.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn set_tag_name(&mut self, node: NodeId, tag_name: &str) -> Result<(), DomError> {
        tag_name.clone_into(&mut self.as_element_mut(node)?.tag_name);
        Ok(())
    }

    /// Set an attribute. The key is folded to lowercase; `id` and `class`
    /// replace the corresponding set (a `None` value clears it).
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        key: &str,
        value: Option<&str>,
    ) -> Result<(), DomError> {
        let data = self.as_element_mut(node)?;
        let key = key.to_ascii_lowercase();
        let tokens = || {
            value
                .map(|v| v.split_ascii_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };
        match key.as_str() {
            "id" => data.ids = tokens(),
            "class" => data.classes = tokens(),
            _ => {
                let _ = data.attrs.insert(key, value.map(str::to_string));
            }
        }
        Ok(())
    }

    /// Remove an attribute (or clear the id/class set).
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn remove_attribute(&mut self, node: NodeId, key: &str) -> Result<(), DomError> {
        let data = self.as_element_mut(node)?;
        match key.to_ascii_lowercase().as_str() {
            "id" => data.ids.clear(),
            "class" => data.classes.clear(),
            other => {
                let _ = data.attrs.shift_remove(other);
            }
        }
        Ok(())
    }

    /// Add a class (kept once, at its first position).
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let _ = self.as_element_mut(node)?.classes.insert(class.to_string());
        Ok(())
    }

    /// Remove a class, keeping the order of the others.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), DomError> {
        let _ = self.as_element_mut(node)?.classes.shift_remove(class);
        Ok(())
    }

    /// Add an id (kept once, at its first position).
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn add_id(&mut self, node: NodeId, id: &str) -> Result<(), DomError> {
        let _ = self.as_element_mut(node)?.ids.insert(id.to_string());
        Ok(())
    }

    /// Remove an id, keeping the order of the others.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node kind.
    pub fn remove_id(&mut self, node: NodeId, id: &str) -> Result<(), DomError> {
        let _ = self.as_element_mut(node)?.ids.shift_remove(id);
        Ok(())
    }

    /// Replace the payload of a text node, or the body of a comment (which
    /// is wrapped in `<!--` and `-->` again).
    ///
    /// # Errors
    ///
    /// [`DomError::NotCharacterData`] for elements and the root.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        match self.get_mut(node).map(|n| &mut n.node_type) {
            Some(NodeType::Text(data)) => {
                text.clone_into(data);
                Ok(())
            }
            Some(NodeType::Comment(data)) => {
                *data = wrap_comment(text);
                Ok(())
            }
            Some(_) => Err(DomError::NotCharacterData(node)),
            None => Err(DomError::UnknownNode(node)),
        }
    }
}
