//! Prototype instantiation.
//!
//! A prototype is an id-less node tree, typically produced by an import
//! pipeline. Instantiation assigns fresh ids depth-first and links each
//! child list only after all of its children are registered, so no parent
//! ever holds an id missing from the document.

use fc_core::{Document, DocumentError, Node, NodeId, NodeKind, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePrototype {
    /// Defaults to the type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Ignored for variants that cannot hold children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodePrototype>,
}

impl NodePrototype {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            active: None,
            locked: None,
            kind,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<NodePrototype>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes this tree instantiates.
    pub fn node_count(&self) -> usize {
        let nested: usize = if self.kind.node_type().is_container() {
            self.children.iter().map(NodePrototype::node_count).sum()
        } else {
            0
        };
        1 + nested
    }
}

/// Register every node of `prototype` and return the id of its top node.
/// The top node is not linked to any parent.
pub fn instantiate(document: &mut Document, prototype: &NodePrototype) -> NodeId {
    let ty = prototype.kind.node_type();
    let id = document.fresh_id(ty.as_str());

    let mut kind = prototype.kind.clone();
    match kind.children_mut() {
        Some(children) => {
            let child_ids: Vec<NodeId> = prototype
                .children
                .iter()
                .map(|child| instantiate(document, child))
                .collect();
            *children = child_ids;
        }
        None => {
            if !prototype.children.is_empty() {
                log::debug!(
                    "{ty} prototype cannot hold children; {} dropped",
                    prototype.children.len()
                );
            }
        }
    }

    document.register(Node {
        id,
        name: prototype.name.clone().unwrap_or_else(|| ty.as_str().to_string()),
        active: prototype.active.unwrap_or(true),
        locked: prototype.locked.unwrap_or(false),
        userdata: None,
        kind,
    });
    id
}

/// Instantiate `prototype` and append it under `parent`.
///
/// Returns `Ok(None)` and leaves the document untouched when `parent`
/// cannot hold children.
///
/// # Errors
/// [`DocumentError::NodeNotFound`] if `parent` is missing.
pub fn insert_prototype(
    document: &mut Document,
    parent: NodeId,
    prototype: &NodePrototype,
) -> Result<Option<NodeId>> {
    let parent_node = document
        .get(parent)
        .ok_or(DocumentError::NodeNotFound(parent))?;
    if !parent_node.node_type().is_container() {
        log::debug!("cannot insert under {} `{parent}`", parent_node.node_type());
        return Ok(None);
    }
    let id = instantiate(document, prototype);
    document.link_child(parent, id)?;
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::{ContainerNode, NodeType};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;

    fn doc() -> Document {
        Document::new(Node::new(
            NodeId::intern("ins_root"),
            NodeKind::Container(ContainerNode::default()),
        ))
    }

    fn tree() -> NodePrototype {
        serde_json::from_value(json!({
            "type": "container",
            "name": "Card",
            "children": [
                { "type": "text", "text": "Title" },
                {
                    "type": "container",
                    "children": [
                        { "type": "rectangle", "width": 10, "height": 10 },
                        { "type": "ellipse" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn ids_are_fresh_and_distinct() {
        let mut document = doc();
        let proto = tree();
        assert_eq!(proto.node_count(), 5);
        let before = document.nodes.len();
        let root = document.root_id;
        let top = insert_prototype(&mut document, root, &proto)
            .unwrap()
            .unwrap();

        let subtree = document.subtree(top);
        assert_eq!(subtree.len(), 5);
        assert_eq!(document.nodes.len(), before + 5);
        let unique: HashSet<NodeId> = subtree.iter().copied().collect();
        assert_eq!(unique.len(), 5);

        for id in &subtree {
            for child in document.children_of(*id) {
                assert!(document.contains(*child), "dangling child {child}");
            }
        }
    }

    #[test]
    fn defaults_follow_prototype() {
        let mut document = doc();
        let root = document.root_id;
        let top = insert_prototype(&mut document, root, &tree())
            .unwrap()
            .unwrap();
        let card = document.get(top).unwrap();
        assert_eq!(card.name, "Card");
        assert!(card.active);
        assert!(!card.locked);

        let title = document.get(card.children()[0]).unwrap();
        assert_eq!(title.name, "text");
        assert_eq!(title.node_type(), NodeType::Text);
        assert!(title.id.as_str().starts_with("text_"));
    }

    #[test]
    fn leaf_parent_refuses_insert() {
        let mut document = doc();
        let root = document.root_id;
        let leaf = insert_prototype(
            &mut document,
            root,
            &NodePrototype::new(NodeKind::new_default(NodeType::Ellipse).unwrap()),
        )
        .unwrap()
        .unwrap();
        let count = document.nodes.len();
        assert_eq!(insert_prototype(&mut document, leaf, &tree()).unwrap(), None);
        assert_eq!(document.nodes.len(), count);
    }

    #[test]
    fn children_of_leaf_prototypes_are_dropped() {
        let mut document = doc();
        let proto = NodePrototype::new(NodeKind::new_default(NodeType::Rectangle).unwrap())
            .with_children(vec![NodePrototype::new(
                NodeKind::new_default(NodeType::Text).unwrap(),
            )]);
        assert_eq!(proto.node_count(), 1);
        let root = document.root_id;
        insert_prototype(&mut document, root, &proto).unwrap();
        assert_eq!(document.nodes.len(), 2);
    }
}
