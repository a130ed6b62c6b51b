//! Flat document graph: an arena of nodes keyed by id plus a root pointer.
//!
//! Parent → child structure lives only in each node's `children` list; nodes
//! never own other nodes by value. Parent lookup is a linear scan over the
//! container nodes, which keeps every mutation a plain map replace.

use crate::error::{DocumentError, Result};
use crate::id::NodeId;
use crate::model::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub root_id: NodeId,
    pub nodes: HashMap<NodeId, Node>,
}

impl Document {
    /// Create a document holding only `root`.
    #[must_use]
    pub fn new(root: Node) -> Self {
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self { root_id, nodes }
    }

    /// Parse a document from its JSON form.
    ///
    /// # Errors
    /// Returns [`DocumentError::Json`] on malformed input and
    /// [`DocumentError::NodeNotFound`] if `root_id` is not in `nodes`.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        if !doc.nodes.contains_key(&doc.root_id) {
            return Err(DocumentError::NodeNotFound(doc.root_id));
        }
        Ok(doc)
    }

    /// # Errors
    /// Returns [`DocumentError::Json`] if a node fails to serialize.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&self.root_id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Look up a node that must exist.
    ///
    /// # Errors
    /// [`DocumentError::NodeNotFound`] when the id is absent.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(DocumentError::NodeNotFound(id))
    }

    /// Replace an existing node value in place.
    ///
    /// # Errors
    /// [`DocumentError::NodeNotFound`] when no node with `node.id` exists.
    pub fn replace(&mut self, node: Node) -> Result<()> {
        match self.nodes.get_mut(&node.id) {
            Some(slot) => {
                *slot = node;
                Ok(())
            }
            None => Err(DocumentError::NodeNotFound(node.id)),
        }
    }

    /// Register a node without linking it to any parent.
    pub fn register(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    /// A generated id not yet used in this document.
    pub fn fresh_id(&self, prefix: &str) -> NodeId {
        loop {
            let id = NodeId::with_prefix(prefix);
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Child ids of `id`; empty for leaves and unknown ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(Node::children).unwrap_or(&[])
    }

    /// The unique parent of `id`, or `None` for the root and detached nodes.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.children().contains(&id))
            .map(|n| n.id)
    }

    /// `id` followed by all of its descendants in depth-first pre-order.
    ///
    /// Ids listed as children but missing from the arena are skipped.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if out.contains(&current) {
                continue; // cycle in a corrupted document
            }
            out.push(current);
            for &child in self.children_of(current).iter().rev() {
                if self.contains(child) {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Whether `ancestor` is a strict ancestor of `descendant`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        ancestor != descendant && self.subtree(ancestor).contains(&descendant)
    }

    /// Append `child` to `parent`'s children list.
    ///
    /// Returns `Ok(false)` when the parent's variant cannot hold children.
    ///
    /// # Errors
    /// [`DocumentError::NodeNotFound`] if either id is missing.
    pub fn link_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        if !self.contains(child) {
            return Err(DocumentError::NodeNotFound(child));
        }
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(DocumentError::NodeNotFound(parent))?;
        match parent_node.kind.children_mut() {
            Some(children) => {
                if !children.contains(&child) {
                    children.push(child);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Register `node` and append it under `parent`.
    ///
    /// A parent that cannot hold children leaves the document unchanged and
    /// returns `Ok(false)`.
    ///
    /// # Errors
    /// [`DocumentError::NodeNotFound`] if `parent` is missing.
    pub fn insert(&mut self, parent: NodeId, node: Node) -> Result<bool> {
        let accepts = self
            .nodes
            .get(&parent)
            .ok_or(DocumentError::NodeNotFound(parent))?
            .node_type()
            .is_container();
        if !accepts {
            return Ok(false);
        }
        let id = node.id;
        self.register(node);
        self.link_child(parent, id)
    }

    /// Remove `id` and every descendant, detaching it from its parent.
    ///
    /// Returns the removed nodes in pre-order (the node itself first).
    ///
    /// # Errors
    /// [`DocumentError::NodeNotFound`] if `id` is missing.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<Vec<Node>> {
        if !self.contains(id) {
            return Err(DocumentError::NodeNotFound(id));
        }
        if let Some(parent) = self.parent_of(id)
            && let Some(children) = self
                .nodes
                .get_mut(&parent)
                .and_then(|p| p.kind.children_mut())
        {
            children.retain(|c| *c != id);
        }
        let removed = self
            .subtree(id)
            .into_iter()
            .filter_map(|n| self.nodes.remove(&n))
            .collect();
        Ok(removed)
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Move a child to index 0 of its parent (renders behind its siblings).
    /// Returns true if the order changed.
    pub fn send_to_back(&mut self, child: NodeId) -> bool {
        self.reorder(child, |_, _| 0)
    }

    /// Move a child to the last index of its parent.
    pub fn bring_to_front(&mut self, child: NodeId) -> bool {
        self.reorder(child, |_, len| len - 1)
    }

    /// Swap a child with its previous sibling.
    pub fn send_backward(&mut self, child: NodeId) -> bool {
        self.reorder(child, |pos, _| pos.saturating_sub(1))
    }

    /// Swap a child with its next sibling.
    pub fn bring_forward(&mut self, child: NodeId) -> bool {
        self.reorder(child, |pos, len| (pos + 1).min(len - 1))
    }

    fn reorder(&mut self, child: NodeId, target: impl Fn(usize, usize) -> usize) -> bool {
        let Some(parent) = self.parent_of(child) else {
            return false;
        };
        let Some(siblings) = self
            .nodes
            .get_mut(&parent)
            .and_then(|p| p.kind.children_mut())
        else {
            return false;
        };
        let Some(from) = siblings.iter().position(|&s| s == child) else {
            return false;
        };
        let to = target(from, siblings.len());
        if from == to {
            return false;
        }
        let moved = siblings.remove(from);
        siblings.insert(to, moved);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContainerNode, Layer, NodeKind, NodeType, RectangleNode};
    use pretty_assertions::assert_eq;

    fn container(id: &str) -> Node {
        Node::new(
            NodeId::intern(id),
            NodeKind::Container(ContainerNode::default()),
        )
    }

    fn rect(id: &str) -> Node {
        Node::new(
            NodeId::intern(id),
            NodeKind::Rectangle(RectangleNode {
                layer: Layer::fixed(0.0, 0.0, 10.0, 10.0),
                ..RectangleNode::default()
            }),
        )
    }

    fn sample() -> Document {
        let mut doc = Document::new(container("doc_root"));
        let root = doc.root_id;
        doc.insert(root, container("doc_group")).unwrap();
        doc.insert(NodeId::intern("doc_group"), rect("doc_a")).unwrap();
        doc.insert(NodeId::intern("doc_group"), rect("doc_b")).unwrap();
        doc.insert(root, rect("doc_c")).unwrap();
        doc
    }

    #[test]
    fn parent_and_subtree() {
        let doc = sample();
        assert_eq!(
            doc.parent_of(NodeId::intern("doc_a")),
            Some(NodeId::intern("doc_group"))
        );
        assert_eq!(doc.parent_of(doc.root_id), None);

        let subtree = doc.subtree(NodeId::intern("doc_group"));
        let ids: Vec<&str> = subtree
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, vec!["doc_group", "doc_a", "doc_b"]);
        assert!(doc.is_ancestor_of(doc.root_id, NodeId::intern("doc_b")));
        assert!(!doc.is_ancestor_of(NodeId::intern("doc_b"), doc.root_id));
    }

    #[test]
    fn insert_into_leaf_is_refused() {
        let mut doc = sample();
        let inserted = doc.insert(NodeId::intern("doc_c"), rect("doc_d")).unwrap();
        assert!(!inserted);
        assert!(!doc.contains(NodeId::intern("doc_d")));
    }

    #[test]
    fn remove_subtree_cascades_and_unlinks() {
        let mut doc = sample();
        let removed = doc.remove_subtree(NodeId::intern("doc_group")).unwrap();
        assert_eq!(removed.len(), 3);
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.children_of(doc.root_id), &[NodeId::intern("doc_c")]);
        assert!(doc.remove_subtree(NodeId::intern("doc_group")).is_err());
    }

    #[test]
    fn z_order_moves() {
        let mut doc = sample();
        let group = NodeId::intern("doc_group");
        let a = NodeId::intern("doc_a");
        let b = NodeId::intern("doc_b");

        assert!(doc.bring_to_front(a));
        assert_eq!(doc.children_of(group), &[b, a]);
        assert!(!doc.bring_forward(a));
        assert!(doc.send_backward(a));
        assert_eq!(doc.children_of(group), &[a, b]);
        assert!(!doc.send_to_back(a));
        assert!(!doc.send_to_back(doc.root_id));
    }

    #[test]
    fn fresh_ids_avoid_existing() {
        let doc = sample();
        let id = doc.fresh_id(NodeType::Rectangle.as_str());
        assert!(!doc.contains(id));
        assert!(id.as_str().starts_with("rectangle_"));
    }

    #[test]
    fn json_requires_known_root() {
        let json = r#"{ "root_id": "nowhere", "nodes": {} }"#;
        assert_eq!(
            Document::from_json(json),
            Err(DocumentError::NodeNotFound(NodeId::intern("nowhere")))
        );
    }
}
