//! Property schema edits on a `component` root.

use crate::action::SchemaAction;
use fc_core::{Document, DocumentError, NodeKind, Result};

/// Apply one schema edit to the document root.
///
/// Defining an existing name, updating or deleting a missing one, and
/// renaming onto a taken name leave the schema unchanged.
///
/// # Errors
/// [`DocumentError::NotAComponent`] when the root is not a `component`.
pub fn apply_schema(document: &mut Document, change: &SchemaAction) -> Result<()> {
    let root_id = document.root_id;
    let root = document
        .get_mut(root_id)
        .ok_or(DocumentError::NodeNotFound(root_id))?;
    let ty = root.node_type();
    let NodeKind::Component(component) = &mut root.kind else {
        log::warn!("schema change on {ty} root `{root_id}`");
        return Err(DocumentError::NotAComponent(root_id));
    };
    let properties = &mut component.properties;

    match change {
        SchemaAction::Define { name, definition } => {
            if properties.contains_key(name) {
                log::debug!("property `{name}` already defined");
            } else {
                properties.insert(name.clone(), definition.clone());
            }
        }
        SchemaAction::Update { name, definition } => match properties.get_mut(name) {
            Some(slot) => *slot = definition.clone(),
            None => log::debug!("cannot update undefined property `{name}`"),
        },
        SchemaAction::Rename { name, new_name } => {
            if properties.contains_key(new_name) {
                log::debug!("rename `{name}` -> `{new_name}` collides; skipped");
            } else if let Some(definition) = properties.remove(name) {
                properties.insert(new_name.clone(), definition);
            } else {
                log::debug!("cannot rename undefined property `{name}`");
            }
        }
        SchemaAction::Delete { name } => {
            if properties.remove(name).is_none() {
                log::debug!("cannot delete undefined property `{name}`");
            }
        }
    }
    Ok(())
}
