//! Editor session state.
//!
//! `EditorState` is the immutable snapshot produced by every dispatch: the
//! document plus selection, hover, clipboard, cursor mode and the surface's
//! gesture tracking. Template definitions are shared read-only behind an `Arc`.

use crate::action::Target;
use crate::clipboard::ClipboardEntry;
use crate::input::Modifiers;
use fc_core::transform::ResizeAnchor;
use fc_core::{
    Document, EditorConfig, NodeId, NodeType, Point, RaycastTargeting, Rect, TemplateRegistry,
    Vec2,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Ordered selection. Most operations treat it as a set.
pub type Selection = SmallVec<[NodeId; 4]>;

/// What the next pointer interaction on the canvas does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "node_type", rename_all = "snake_case")]
pub enum CursorMode {
    /// Select and move.
    #[default]
    Cursor,
    /// The next drag creates a node of this type.
    Insert(NodeType),
    /// Freehand path drawing.
    Draw,
    /// Vector point editing.
    Path,
}

/// In-place content editing of the selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentEditMode {
    Text,
    Path,
}

/// The interactive gesture tracked between its start and end events.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Moving the selected node.
    Translate,
    Resize {
        anchor: ResizeAnchor,
    },
    Rotate {
        node_id: NodeId,
        center: Point,
        /// Pointer angle (degrees) when the gesture started.
        start_angle: f64,
        /// Node rotation when the gesture started.
        base_rotation: f64,
    },
    CornerRadius,
    Marquee {
        origin: Point,
    },
    /// Freehand drawing into a vector node.
    Draw {
        node_id: NodeId,
        origin: Point,
        points: Vec<Point>,
    },
}

/// Pointer and gesture tracking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceState {
    pub gesture: Gesture,
    pub is_dragging: bool,
    /// Accumulated pointer movement since the drag started.
    pub movement: Vec2,
    /// Normalized marquee rectangle while a marquee gesture is active.
    pub marquee: Option<Rect>,
    /// Last known pointer position.
    pub pointer: Point,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub document: Document,
    pub templates: Arc<TemplateRegistry>,
    pub config: EditorConfig,
    pub selection: Selection,
    pub hovered_node_id: Option<NodeId>,
    pub clipboard: Option<ClipboardEntry>,
    pub cursor_mode: CursorMode,
    pub surface: SurfaceState,
    pub content_edit_mode: Option<ContentEditMode>,
    pub raycast_targeting: RaycastTargeting,
}

impl EditorState {
    #[must_use]
    pub fn new(document: Document, templates: Arc<TemplateRegistry>, config: EditorConfig) -> Self {
        let raycast_targeting = config.default_raycast_targeting;
        Self {
            document,
            templates,
            config,
            selection: Selection::new(),
            hovered_node_id: None,
            clipboard: None,
            cursor_mode: CursorMode::Cursor,
            surface: SurfaceState::default(),
            content_edit_mode: None,
            raycast_targeting,
        }
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.surface.gesture, Gesture::Resize { .. })
    }

    pub fn resize_anchor(&self) -> Option<ResizeAnchor> {
        match self.surface.gesture {
            Gesture::Resize { anchor } => Some(anchor),
            _ => None,
        }
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(&id)
    }

    /// Replace the selection.
    pub fn select(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selection.clear();
        for id in ids {
            if !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: NodeId) {
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
    }

    /// Expand a target into concrete node ids, deduplicated, in order.
    pub fn targets(&self, target: &Target) -> Selection {
        let mut out = Selection::new();
        let ids: &[NodeId] = match target {
            Target::Selection => &self.selection,
            Target::Node(id) => std::slice::from_ref(id),
            Target::Nodes(ids) => ids,
        };
        for id in ids {
            if !out.contains(id) {
                out.push(*id);
            }
        }
        out
    }

    /// Drop ids that no longer exist from selection and hover.
    pub fn prune_missing(&mut self) {
        let document = &self.document;
        self.selection.retain(|id| document.contains(*id));
        if self.hovered_node_id.is_some_and(|id| !document.contains(id)) {
            self.hovered_node_id = None;
        }
    }

    /// Reset the surface to idle, keeping pointer position and modifiers.
    pub fn end_gesture(&mut self) {
        self.surface.gesture = Gesture::Idle;
        self.surface.is_dragging = false;
        self.surface.movement = Vec2::ZERO;
        self.surface.marquee = None;
    }
}
