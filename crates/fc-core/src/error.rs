//! Structural failures raised by document queries and mutations.
//!
//! Every variant signals caller or state corruption, never recoverable user
//! input. Policy no-ops (unsupported change, rename collision, deleting the
//! root, ...) are not errors and never surface here.

use crate::id::{NodeId, TemplateId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The id is absent from the document and from every template.
    #[error("node `{0}` not found in document or templates")]
    NodeNotFound(NodeId),

    #[error("template `{0}` is not registered")]
    TemplateNotFound(TemplateId),

    /// More than one template defines the id; global resolution cannot pick one.
    #[error("node `{0}` is defined by more than one template")]
    AmbiguousTemplateNode(NodeId),

    /// No live `template_instance` node references the owning template.
    #[error("no template instance in the document references template `{0}`")]
    TemplateInstanceNotFound(TemplateId),

    #[error("node `{0}` is not a template instance")]
    NotATemplateInstance(NodeId),

    /// Schema actions require a `component` root.
    #[error("node `{0}` is not a component")]
    NotAComponent(NodeId),

    /// The parent chain loops back on itself.
    #[error("node `{0}` is its own ancestor")]
    Cycle(NodeId),

    #[error("invalid override: {0}")]
    Override(String),

    #[error("json error: {0}")]
    Json(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T, E = DocumentError> = std::result::Result<T, E>;

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_id() {
        let err = DocumentError::NodeNotFound(NodeId::intern("ghost"));
        assert_eq!(err.to_string(), "node `ghost` not found in document or templates");

        let err = DocumentError::TemplateNotFound(TemplateId::intern("tpl-missing"));
        assert!(err.to_string().contains("tpl-missing"));
    }
}
