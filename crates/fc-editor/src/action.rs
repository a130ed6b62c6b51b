//! The closed set of actions accepted by the document reducer.

use crate::input::SurfaceEvent;
use crate::insert::NodePrototype;
use fc_core::cmath::{Alignment, Axis};
use fc_core::{NodeChange, NodeId, PropertyDefinition, TransformOp};
use serde::{Deserialize, Serialize};

/// Which nodes an action applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Selection,
    Node(NodeId),
    Nodes(Vec<NodeId>),
}

/// Z-order change within the parent's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Index 0: behind every sibling.
    Back,
    /// Last index: in front of every sibling.
    Front,
    Backward,
    Forward,
}

/// A change to a single node: a property edit or a geometric transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeAction {
    Change(NodeChange),
    Transform(TransformOp),
}

/// Edits to the property schema of a `component` root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SchemaAction {
    Define {
        name: String,
        definition: PropertyDefinition,
    },
    Rename {
        name: String,
        new_name: String,
    },
    Update {
        name: String,
        definition: PropertyDefinition,
    },
    Delete {
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Copy {
        target: Target,
    },
    Cut {
        target: Target,
    },
    Paste,
    Delete {
        target: Target,
    },
    Nudge {
        target: Target,
        axis: Axis,
        delta: f64,
    },
    Align {
        target: Target,
        alignment: Alignment,
    },
    DistributeEvenly {
        target: Target,
        axis: Axis,
    },
    /// Instantiate a prototype tree under `parent` (the root when absent).
    Insert {
        prototype: NodePrototype,
        #[serde(default)]
        parent: Option<NodeId>,
    },
    Node {
        node_id: NodeId,
        change: NodeAction,
    },
    Order {
        target: Target,
        order: Order,
    },
    /// Edit a template node through one instance; only the override is written.
    TemplateOverride {
        template_instance_node_id: NodeId,
        node_id: NodeId,
        change: NodeAction,
    },
    Schema {
        change: SchemaAction,
    },
    Select {
        ids: Vec<NodeId>,
    },
    Blur,
    SelectAll,
    Hover {
        node_id: Option<NodeId>,
    },
    Surface {
        event: SurfaceEvent,
    },
}

impl Action {
    /// Snake-case tag, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Copy { .. } => "copy",
            Action::Cut { .. } => "cut",
            Action::Paste => "paste",
            Action::Delete { .. } => "delete",
            Action::Nudge { .. } => "nudge",
            Action::Align { .. } => "align",
            Action::DistributeEvenly { .. } => "distribute_evenly",
            Action::Insert { .. } => "insert",
            Action::Node { .. } => "node",
            Action::Order { .. } => "order",
            Action::TemplateOverride { .. } => "template_override",
            Action::Schema { .. } => "schema",
            Action::Select { .. } => "select",
            Action::Blur => "blur",
            Action::SelectAll => "select_all",
            Action::Hover { .. } => "hover",
            Action::Surface { event } => event.name(),
        }
    }
}
