//! Single-slot clipboard shared by the copy/cut/paste actions and the
//! Meta+C / Meta+X / Meta+V surface shortcuts.
//!
//! An entry is a deep copy of one node and its subtree. Pasting re-ids every
//! node so no two pastes share an id, offsets the pasted root, and advances
//! the stored copy by the same offset so consecutive pastes cascade.

use crate::state::{CursorMode, EditorState};
use fc_core::{Document, Node, NodeId, Result, TransformOp, Vec2, apply_transform};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub root: NodeId,
    /// The copied subtree in pre-order, root first.
    pub nodes: Vec<Node>,
}

impl ClipboardEntry {
    /// Deep-copy `id` and its descendants out of `document`.
    fn capture(document: &Document, id: NodeId) -> Result<Self> {
        document.node(id)?;
        let nodes = document
            .subtree(id)
            .into_iter()
            .filter_map(|n| document.get(n).cloned())
            .collect();
        Ok(Self { root: id, nodes })
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == self.root)
    }

    /// Clone the entry with fresh document ids, rewriting child references.
    ///
    /// `None` when the entry's root is not among its nodes.
    fn reidentify(&self, document: &Document) -> Option<(NodeId, Vec<Node>)> {
        let fresh: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|node| document.fresh_id(node.node_type().as_str()))
            .collect();
        let mapping: HashMap<NodeId, NodeId> =
            self.nodes.iter().map(|n| n.id).zip(fresh.iter().copied()).collect();
        let root = mapping.get(&self.root).copied()?;

        let nodes = self
            .nodes
            .iter()
            .zip(fresh)
            .map(|(node, id)| {
                let mut copy = node.clone();
                copy.id = id;
                if let Some(children) = copy.kind.children_mut() {
                    // Children outside the captured subtree were dangling at copy time.
                    *children = children.iter().filter_map(|c| mapping.get(c).copied()).collect();
                }
                copy
            })
            .collect();
        Some((root, nodes))
    }
}

/// The one target copy/cut operate on, `None` (logged) otherwise.
fn single(targets: &[NodeId], op: &str) -> Option<NodeId> {
    match targets {
        [one] => Some(*one),
        _ => {
            log::debug!("{op} needs exactly one node, got {}", targets.len());
            None
        }
    }
}

/// Copy exactly one node into the clipboard.
///
/// # Errors
/// [`fc_core::DocumentError::NodeNotFound`] if the target is missing.
pub fn copy(state: &mut EditorState, targets: &[NodeId]) -> Result<()> {
    let Some(id) = single(targets, "copy") else {
        return Ok(());
    };
    state.clipboard = Some(ClipboardEntry::capture(&state.document, id)?);
    Ok(())
}

/// Copy exactly one node, then delete it with its subtree. The root is
/// copied but never removed.
///
/// # Errors
/// [`fc_core::DocumentError::NodeNotFound`] if the target is missing.
pub fn cut(state: &mut EditorState, targets: &[NodeId]) -> Result<()> {
    let Some(id) = single(targets, "cut") else {
        return Ok(());
    };
    state.clipboard = Some(ClipboardEntry::capture(&state.document, id)?);
    if id == state.document.root_id {
        log::debug!("cut: root `{id}` is copied but kept");
        return Ok(());
    }
    state.document.remove_subtree(id)?;
    state.prune_missing();
    Ok(())
}

/// Paste the clipboard under the document root and select the pasted node.
///
/// Returns the new root id, `None` when the clipboard is empty or its entry
/// does not contain its own root.
///
/// # Errors
/// [`fc_core::DocumentError::NodeNotFound`] if the document root is missing.
pub fn paste(state: &mut EditorState) -> Result<Option<NodeId>> {
    let parent = state.document.root_id;
    if !state.document.node(parent)?.node_type().is_container() {
        log::warn!("paste: root `{parent}` cannot hold children");
        return Ok(None);
    }
    let Some(entry) = state.clipboard.as_mut() else {
        log::debug!("paste: clipboard is empty");
        return Ok(None);
    };
    if entry.root_node().is_none() {
        log::debug!("paste: clipboard root `{}` is not among its nodes", entry.root);
        return Ok(None);
    }

    let offset = TransformOp::Translate {
        delta: Vec2::new(state.config.paste_offset, state.config.paste_offset),
    };
    if let Some(root) = entry.nodes.iter_mut().find(|n| n.id == entry.root) {
        *root = apply_transform(root, &offset, state.config.min_size);
    }

    let Some((new_root, nodes)) = entry.reidentify(&state.document) else {
        return Ok(None);
    };
    for node in nodes {
        state.document.register(node);
    }
    state.document.link_child(parent, new_root)?;

    state.select([new_root]);
    state.cursor_mode = CursorMode::Cursor;
    log::trace!("pasted `{new_root}`");
    Ok(Some(new_root))
}
