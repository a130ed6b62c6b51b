//! Template resolution: virtual nodes exposed by template instances.
//!
//! A node id that is not in the live document may belong to a template. Its
//! resolved value is the template's definition shallow-merged with the owning
//! instance's override for that id. Merging happens on the flat JSON form of
//! the node, key by key; a `null` override value resets the key to its default.
//! Nothing is ever materialized into the document.

use crate::document::Document;
use crate::error::{DocumentError, Result};
use crate::id::{NodeId, TemplateId};
use crate::model::{Node, NodeKind, NodeOverride, TemplateInstanceNode};
use crate::template::{TemplateDefinition, TemplateRegistry};
use serde_json::Value;

/// Keys an override may never change.
const PROTECTED_KEYS: [&str; 2] = ["id", "type"];

/// Resolve `node_id` against the document first, then against every template.
///
/// # Errors
/// - [`DocumentError::NodeNotFound`] if no document node or template defines the id.
/// - [`DocumentError::AmbiguousTemplateNode`] if several templates define it;
///   use [`resolve_in_instance`] to qualify the lookup.
/// - [`DocumentError::TemplateInstanceNotFound`] if no instance stamps the template.
pub fn resolve(document: &Document, templates: &TemplateRegistry, node_id: NodeId) -> Result<Node> {
    if let Some(node) = document.get(node_id) {
        return Ok(node.clone());
    }
    let template = owning_template(templates, node_id)?;
    let instance_id = instance_of(document, template.id)
        .ok_or(DocumentError::TemplateInstanceNotFound(template.id))?;
    resolve_in_instance(document, templates, instance_id, node_id)
}

/// Resolve a template node through a specific `template_instance` node.
///
/// # Errors
/// - [`DocumentError::NodeNotFound`] if the instance or the template node is missing.
/// - [`DocumentError::NotATemplateInstance`] if `instance_id` is another node type.
/// - [`DocumentError::TemplateNotFound`] if the instance's template is not registered.
pub fn resolve_in_instance(
    document: &Document,
    templates: &TemplateRegistry,
    instance_id: NodeId,
    node_id: NodeId,
) -> Result<Node> {
    let instance = template_instance(document, instance_id)?;
    let template = templates
        .get(instance.template_id)
        .ok_or(DocumentError::TemplateNotFound(instance.template_id))?;
    let base = template
        .nodes
        .get(&node_id)
        .ok_or(DocumentError::NodeNotFound(node_id))?;
    match instance.overrides.get(&node_id) {
        Some(patch) => merge_override(base, patch),
        None => Ok(base.clone()),
    }
}

/// The single template that defines `node_id`.
///
/// # Errors
/// [`DocumentError::NodeNotFound`] for no match, [`DocumentError::AmbiguousTemplateNode`]
/// for more than one.
pub fn owning_template(templates: &TemplateRegistry, node_id: NodeId) -> Result<&TemplateDefinition> {
    match templates.defining(node_id).as_slice() {
        [] => Err(DocumentError::NodeNotFound(node_id)),
        [only] => Ok(*only),
        _ => Err(DocumentError::AmbiguousTemplateNode(node_id)),
    }
}

/// A live `template_instance` node stamping `template_id`.
///
/// When several instances stamp the same template the one with the
/// lexicographically smallest id wins, so repeated lookups agree.
pub fn instance_of(document: &Document, template_id: TemplateId) -> Option<NodeId> {
    document
        .nodes
        .values()
        .filter(|n| matches!(&n.kind, NodeKind::TemplateInstance(t) if t.template_id == template_id))
        .map(|n| n.id)
        .min_by(|a, b| a.as_str().cmp(b.as_str()))
}

/// Borrow the template-instance payload of a document node.
///
/// # Errors
/// [`DocumentError::NodeNotFound`] or [`DocumentError::NotATemplateInstance`].
pub fn template_instance(document: &Document, instance_id: NodeId) -> Result<&TemplateInstanceNode> {
    match &document.node(instance_id)?.kind {
        NodeKind::TemplateInstance(t) => Ok(t),
        _ => Err(DocumentError::NotATemplateInstance(instance_id)),
    }
}

// ─── Override merge & diff ───────────────────────────────────────────────

fn to_object(node: &Node) -> Result<serde_json::Map<String, Value>> {
    match serde_json::to_value(node)? {
        Value::Object(map) => Ok(map),
        other => Err(DocumentError::Override(format!(
            "node `{}` serialized to a non-object: {other}",
            node.id
        ))),
    }
}

/// Shallow-merge `patch` over `base`: patch keys win, `null` removes the key.
///
/// # Errors
/// [`DocumentError::Override`] when the merged object is not a valid node.
pub fn merge_override(base: &Node, patch: &NodeOverride) -> Result<Node> {
    let mut merged = to_object(base)?;
    for (key, value) in patch {
        if PROTECTED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if value.is_null() {
            merged.remove(key);
        } else {
            merged.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(Value::Object(merged))
        .map_err(|e| DocumentError::Override(format!("node `{}`: {e}", base.id)))
}

/// Minimal override that turns `base` into `updated`.
///
/// Keys equal in both are omitted; keys that disappeared become `null`.
/// An empty result means `updated` is identical to the template node.
///
/// # Errors
/// [`DocumentError::Override`] if either node fails to serialize.
pub fn diff_override(base: &Node, updated: &Node) -> Result<NodeOverride> {
    let base = to_object(base)?;
    let updated = to_object(updated)?;
    let mut patch = NodeOverride::new();
    for (key, value) in &updated {
        if PROTECTED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if base.get(key) != Some(value) {
            patch.insert(key.clone(), value.clone());
        }
    }
    for key in base.keys() {
        if !updated.contains_key(key) && !PROTECTED_KEYS.contains(&key.as_str()) {
            patch.insert(key.clone(), Value::Null);
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Dimension, Paint};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::from_json(
            r##"[
            {
                "id": "tpl-swatch",
                "nodes": {
                    "swatch_box": {
                        "id": "swatch_box",
                        "type": "rectangle",
                        "width": 10,
                        "height": 10,
                        "fill": { "type": "solid", "color": { "r": 1, "g": 0, "b": 0, "a": 1 } }
                    }
                }
            }
        ]"##,
        )
        .unwrap()
    }

    fn document(overrides: serde_json::Value) -> Document {
        serde_json::from_value(json!({
            "root_id": "rs_root",
            "nodes": {
                "rs_root": { "id": "rs_root", "type": "container", "children": ["rs_instance"] },
                "rs_instance": {
                    "id": "rs_instance",
                    "type": "template_instance",
                    "template_id": "tpl-swatch",
                    "overrides": overrides
                }
            }
        }))
        .unwrap()
    }

    fn fill_of(node: &Node) -> Option<Paint> {
        match &node.kind {
            NodeKind::Rectangle(r) => r.fill.clone(),
            _ => None,
        }
    }

    #[test]
    fn document_nodes_resolve_directly() {
        let doc = document(json!({}));
        let node = resolve(&doc, &registry(), NodeId::intern("rs_root")).unwrap();
        assert_eq!(node.id.as_str(), "rs_root");
    }

    #[test]
    fn override_wins_per_field() {
        let doc = document(json!({
            "swatch_box": { "fill": { "type": "solid", "color": { "r": 0, "g": 0, "b": 1, "a": 1 } } }
        }));
        let node = resolve(&doc, &registry(), NodeId::intern("swatch_box")).unwrap();
        assert_eq!(
            fill_of(&node),
            Some(Paint::solid(Color::rgba(0.0, 0.0, 1.0, 1.0)))
        );
        assert_eq!(node.layer().width, Dimension::Fixed(10.0));
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let doc = document(json!({}));
        assert_eq!(
            resolve(&doc, &registry(), NodeId::intern("rs_ghost")),
            Err(DocumentError::NodeNotFound(NodeId::intern("rs_ghost")))
        );
    }

    #[test]
    fn template_without_instance() {
        let doc = Document::from_json(
            r#"{ "root_id": "rs_lonely", "nodes": { "rs_lonely": { "id": "rs_lonely", "type": "container" } } }"#,
        )
        .unwrap();
        assert_eq!(
            resolve(&doc, &registry(), NodeId::intern("swatch_box")),
            Err(DocumentError::TemplateInstanceNotFound(TemplateId::intern("tpl-swatch")))
        );
    }

    #[test]
    fn scoped_resolution_rejects_wrong_node_type() {
        let doc = document(json!({}));
        assert_eq!(
            resolve_in_instance(&doc, &registry(), NodeId::intern("rs_root"), NodeId::intern("swatch_box")),
            Err(DocumentError::NotATemplateInstance(NodeId::intern("rs_root")))
        );
    }

    #[test]
    fn override_cannot_change_identity() {
        let base = registry()
            .get(TemplateId::intern("tpl-swatch"))
            .unwrap()
            .nodes[&NodeId::intern("swatch_box")]
            .clone();
        let mut patch = NodeOverride::new();
        patch.insert("id".into(), json!("hijacked"));
        patch.insert("type".into(), json!("text"));
        patch.insert("name".into(), json!("Swatch"));
        let merged = merge_override(&base, &patch).unwrap();
        assert_eq!(merged.id, base.id);
        assert_eq!(merged.node_type(), base.node_type());
        assert_eq!(merged.name, "Swatch");
    }

    #[test]
    fn diff_keeps_only_changes() {
        let base = registry()
            .get(TemplateId::intern("tpl-swatch"))
            .unwrap()
            .nodes[&NodeId::intern("swatch_box")]
            .clone();
        assert!(diff_override(&base, &base).unwrap().is_empty());

        let mut updated = base.clone();
        updated.locked = true;
        if let NodeKind::Rectangle(r) = &mut updated.kind {
            r.fill = None;
        }
        let patch = diff_override(&base, &updated).unwrap();
        assert_eq!(patch.len(), 2);
        assert_eq!(patch["locked"], json!(true));
        assert_eq!(patch["fill"], Value::Null);
        assert_eq!(merge_override(&base, &patch).unwrap(), updated);
    }
}
