//! Template definitions: immutable, externally supplied node fragments.
//!
//! A template is stamped into a document by a `template_instance` node; the
//! instance never copies the template's nodes, it records per-node overrides.

use crate::error::Result;
use crate::id::{NodeId, TemplateId};
use crate::model::{Node, PropertyDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    pub nodes: HashMap<NodeId, Node>,
    /// Inputs the template accepts through an instance's `props`.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
    /// Default prop values used when an instance leaves a prop unset.
    #[serde(default)]
    pub default: BTreeMap<String, Value>,
}

impl TemplateDefinition {
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Parent of `id` inside this template, `None` for its top-level nodes.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.children().contains(&id))
            .map(|n| n.id)
    }
}

/// Read-only lookup of template definitions by id.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<TemplateId, TemplateDefinition>,
}

impl TemplateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of template definitions.
    ///
    /// # Errors
    /// Returns [`crate::DocumentError::Json`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        let defs: Vec<TemplateDefinition> = serde_json::from_str(json)?;
        Ok(defs.into_iter().collect())
    }

    /// Register a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, template: TemplateDefinition) {
        self.templates.insert(template.id, template);
    }

    pub fn get(&self, id: TemplateId) -> Option<&TemplateDefinition> {
        self.templates.get(&id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.templates.values()
    }

    /// Every template whose node map contains `id`, ordered by template id.
    pub fn defining(&self, id: NodeId) -> Vec<&TemplateDefinition> {
        let mut found: Vec<&TemplateDefinition> =
            self.templates.values().filter(|t| t.contains(id)).collect();
        found.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        found
    }
}

impl FromIterator<TemplateDefinition> for TemplateRegistry {
    fn from_iter<I: IntoIterator<Item = TemplateDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for template in iter {
            registry.insert(template);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATES: &str = r#"[
        {
            "id": "tpl-card",
            "nodes": {
                "card_frame": { "id": "card_frame", "type": "container", "children": ["card_title"] },
                "card_title": { "id": "card_title", "type": "text", "text": "Title" }
            },
            "properties": { "title": { "type": "string", "required": true } },
            "default": { "title": "Untitled" }
        },
        {
            "id": "tpl-badge",
            "nodes": {
                "badge_dot": { "id": "badge_dot", "type": "ellipse" }
            }
        }
    ]"#;

    #[test]
    fn loads_from_json() {
        let registry = TemplateRegistry::from_json(TEMPLATES).unwrap();
        assert_eq!(registry.len(), 2);
        let card = registry.get(TemplateId::intern("tpl-card")).unwrap();
        assert_eq!(card.nodes.len(), 2);
        assert!(card.properties["title"].required);
        assert_eq!(card.default["title"], "Untitled");
    }

    #[test]
    fn parent_within_template() {
        let registry = TemplateRegistry::from_json(TEMPLATES).unwrap();
        let card = registry.get(TemplateId::intern("tpl-card")).unwrap();
        assert_eq!(
            card.parent_of(NodeId::intern("card_title")),
            Some(NodeId::intern("card_frame"))
        );
        assert_eq!(card.parent_of(NodeId::intern("card_frame")), None);
    }

    #[test]
    fn defining_finds_owner() {
        let registry = TemplateRegistry::from_json(TEMPLATES).unwrap();
        let owners = registry.defining(NodeId::intern("badge_dot"));
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].id.as_str(), "tpl-badge");
        assert!(registry.defining(NodeId::intern("nobody")).is_empty());
    }
}
