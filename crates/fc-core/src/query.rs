//! Read-only traversal over a document and the templates it stamps.
//!
//! Template nodes hang off their instance: the parent of a template's
//! top-level node is the `template_instance` node that stamps it.

use crate::document::Document;
use crate::error::{DocumentError, Result};
use crate::id::NodeId;
use crate::model::Node;
use crate::resolve::{instance_of, owning_template, resolve};
use crate::template::TemplateRegistry;
use std::collections::HashSet;

/// Resolved value of `id` (document node or template node with overrides).
///
/// # Errors
/// See [`resolve`].
pub fn get_node_by_id(document: &Document, templates: &TemplateRegistry, id: NodeId) -> Result<Node> {
    resolve(document, templates, id)
}

/// The unique parent of `id`, `None` for the document root.
///
/// # Errors
/// [`DocumentError::NodeNotFound`] if the id is absent from the document and
/// every template, [`DocumentError::AmbiguousTemplateNode`] if several
/// templates define it.
pub fn get_parent_id(
    document: &Document,
    templates: &TemplateRegistry,
    id: NodeId,
) -> Result<Option<NodeId>> {
    if document.contains(id) {
        return Ok(document.parent_of(id));
    }
    let template = owning_template(templates, id)?;
    Ok(template
        .parent_of(id)
        .or_else(|| instance_of(document, template.id)))
}

/// Ancestor chain of `id`, nearest parent first, ending at the root.
///
/// # Errors
/// See [`get_parent_id`].
pub fn get_ancestors(document: &Document, templates: &TemplateRegistry, id: NodeId) -> Result<Vec<NodeId>> {
    let mut ancestors = Vec::new();
    let mut seen = HashSet::from([id]);
    let mut current = id;
    while let Some(parent) = get_parent_id(document, templates, current)? {
        if !seen.insert(parent) {
            log::warn!("parent cycle detected above {id}");
            return Err(DocumentError::Cycle(parent));
        }
        ancestors.push(parent);
        current = parent;
    }
    Ok(ancestors)
}

/// Number of ancestors of `id`; the root has depth 0.
///
/// # Errors
/// See [`get_parent_id`].
pub fn get_depth(document: &Document, templates: &TemplateRegistry, id: NodeId) -> Result<usize> {
    get_ancestors(document, templates, id).map(|a| a.len())
}
