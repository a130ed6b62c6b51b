//! Input abstraction layer.
//!
//! Normalizes pointer and keyboard events from the host into `SurfaceEvent`s
//! consumed by the surface state machine. Positions are in canvas space.

use crate::state::CursorMode;
use fc_core::transform::ResizeAnchor;
use fc_core::{NodeId, Point};
use serde::{Deserialize, Serialize};

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    /// No modifier at all.
    pub fn is_empty(self) -> bool {
        self == Modifiers::NONE
    }
}

/// A normalized surface event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// Pointer moved; updates the tracked position only.
    PointerMove { position: Point },
    /// Re-resolve the hovered node at the current pointer position.
    Raycast,
    PointerDown {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer released; abandons any gesture still in progress.
    PointerUp,
    DragStart {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Drag { position: Point },
    DragEnd {
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer pressed on a resize handle of the selection.
    StartResize { anchor: ResizeAnchor },
    /// Pointer pressed on the rotation handle of the selected node.
    StartRotate,
    /// Pointer pressed on the corner-radius handle of the selected node.
    StartCornerRadius,
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    TryEnterContentEditMode,
    ExitContentEditMode,
    SetCursorMode { mode: CursorMode },
    /// Host-side hover (e.g. from a layers panel), bypassing the raycast.
    HoverNode { node_id: Option<NodeId> },
}

impl SurfaceEvent {
    /// Snake-case tag, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::PointerMove { .. } => "pointer_move",
            SurfaceEvent::Raycast => "raycast",
            SurfaceEvent::PointerDown { .. } => "pointer_down",
            SurfaceEvent::PointerUp => "pointer_up",
            SurfaceEvent::DragStart { .. } => "drag_start",
            SurfaceEvent::Drag { .. } => "drag",
            SurfaceEvent::DragEnd { .. } => "drag_end",
            SurfaceEvent::StartResize { .. } => "start_resize",
            SurfaceEvent::StartRotate => "start_rotate",
            SurfaceEvent::StartCornerRadius => "start_corner_radius",
            SurfaceEvent::KeyDown { .. } => "key_down",
            SurfaceEvent::KeyUp { .. } => "key_up",
            SurfaceEvent::TryEnterContentEditMode => "try_enter_content_edit_mode",
            SurfaceEvent::ExitContentEditMode => "exit_content_edit_mode",
            SurfaceEvent::SetCursorMode { .. } => "set_cursor_mode",
            SurfaceEvent::HoverNode { .. } => "hover_node",
        }
    }

    /// Extract the position if this is a positioned pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            SurfaceEvent::PointerMove { position }
            | SurfaceEvent::PointerDown { position, .. }
            | SurfaceEvent::DragStart { position, .. }
            | SurfaceEvent::Drag { position } => Some(*position),
            _ => None,
        }
    }
}
