//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. `key` is the
//! host's `KeyboardEvent.key` value (e.g. `"r"`, `"ArrowLeft"`, `"Backspace"`).
//! On macOS `meta` is ⌘; elsewhere `ctrl` plays the same role.

use crate::input::Modifiers;
use crate::state::CursorMode;
use fc_core::NodeType;
use fc_core::cmath::Axis;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    // ── Tools ──
    SetCursorMode(CursorMode),

    // ── Edit ──
    Delete,
    Nudge { axis: Axis, delta: f64 },
    SelectAll,
    Copy,
    Cut,
    Paste,

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    /// Leave content editing, then insert mode, then the selection.
    Escape,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `nudge` and `nudge_large` are the arrow-key distances without and
    /// with Shift. Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        modifiers: Modifiers,
        nudge: f64,
        nudge_large: f64,
    ) -> Option<ShortcutAction> {
        let cmd = modifiers.ctrl || modifiers.meta;

        // ── Modifier combos first (most specific) ──
        if cmd && modifiers.shift {
            return match key {
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        // ── Arrows nudge, Shift for the large step ──
        let step = if modifiers.shift { nudge_large } else { nudge };
        let nudge = match key {
            "ArrowLeft" => Some((Axis::X, -step)),
            "ArrowRight" => Some((Axis::X, step)),
            "ArrowUp" => Some((Axis::Y, -step)),
            "ArrowDown" => Some((Axis::Y, step)),
            _ => None,
        };
        if let Some((axis, delta)) = nudge {
            return Some(ShortcutAction::Nudge { axis, delta });
        }

        if key == "Escape" {
            return Some(ShortcutAction::Escape);
        }

        if modifiers.shift || modifiers.alt {
            return None;
        }

        // ── Single keys (no modifiers) ──
        let insert = |ty| Some(ShortcutAction::SetCursorMode(CursorMode::Insert(ty)));
        match key {
            "v" => Some(ShortcutAction::SetCursorMode(CursorMode::Cursor)),
            "r" => insert(NodeType::Rectangle),
            "t" => insert(NodeType::Text),
            "o" => insert(NodeType::Ellipse),
            "f" | "a" => insert(NodeType::Container),
            "l" => insert(NodeType::Line),
            "Backspace" | "Delete" => Some(ShortcutAction::Delete),
            _ => None,
        }
    }
}
