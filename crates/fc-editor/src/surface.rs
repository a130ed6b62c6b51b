//! Surface state machine: pointer gestures, keyboard shortcuts and hover.
//!
//! Pointer events drive a [`Gesture`] from its start event to `drag_end` or
//! `pointer_up`. Every document mutation a gesture produces goes through the
//! same node update path as the matching reducer action, so gestures and
//! actions never diverge. Positions are in canvas space.

use crate::action::{Action, NodeAction, Order, Target};
use crate::geometry::GeometryOracle;
use crate::input::{Modifiers, SurfaceEvent};
use crate::reducer::{self, update_node};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::state::{ContentEditMode, CursorMode, EditorState, Gesture};
use fc_core::cmath::{angle_deg, rect_from_points};
use fc_core::{
    Change, Dimension, Node, NodeChange, NodeId, NodeKind, NodeType, Point, Position, RaycastTargeting,
    ResizeAnchor, Result, TransformOp, Vec2, VectorPath, get_depth, get_node_by_id,
};

pub(crate) fn apply_event(state: &mut EditorState, event: SurfaceEvent, oracle: &dyn GeometryOracle) -> Result<()> {
    match event {
        SurfaceEvent::PointerMove { position } => {
            state.surface.pointer = position;
            Ok(())
        }
        SurfaceEvent::Raycast => {
            state.hovered_node_id = raycast(state, state.surface.pointer, oracle);
            Ok(())
        }
        SurfaceEvent::PointerDown { position, modifiers } => {
            pointer_down(state, position, modifiers);
            Ok(())
        }
        SurfaceEvent::PointerUp => {
            state.end_gesture();
            Ok(())
        }
        SurfaceEvent::DragStart { position, modifiers } => drag_start(state, position, modifiers, oracle),
        SurfaceEvent::Drag { position } => drag(state, position),
        SurfaceEvent::DragEnd { modifiers } => {
            drag_end(state, modifiers, oracle);
            Ok(())
        }
        SurfaceEvent::StartResize { anchor } => {
            arm(state, Gesture::Resize { anchor });
            Ok(())
        }
        SurfaceEvent::StartRotate => start_rotate(state, oracle),
        SurfaceEvent::StartCornerRadius => {
            arm(state, Gesture::CornerRadius);
            Ok(())
        }
        SurfaceEvent::KeyDown { key, modifiers } => key_down(state, &key, modifiers, oracle),
        SurfaceEvent::KeyUp { key, modifiers } => {
            state.surface.modifiers = modifiers;
            if key == "Meta" {
                state.raycast_targeting = state.config.default_raycast_targeting;
            }
            Ok(())
        }
        SurfaceEvent::TryEnterContentEditMode => try_enter_content_edit_mode(state),
        SurfaceEvent::ExitContentEditMode => {
            exit_content_edit_mode(state);
            Ok(())
        }
        SurfaceEvent::SetCursorMode { mode } => {
            state.cursor_mode = mode;
            Ok(())
        }
        SurfaceEvent::HoverNode { node_id } => {
            state.hovered_node_id = node_id;
            Ok(())
        }
    }
}

// ─── Raycast ─────────────────────────────────────────────────────────────

/// The selectable node under `point` according to the targeting mode.
///
/// `Shallowest` picks the least nested hit, `Deepest` the most nested one;
/// ties go to the topmost. The root, locked and inactive nodes never win.
fn raycast(state: &EditorState, point: Point, oracle: &dyn GeometryOracle) -> Option<NodeId> {
    let root = state.document.root_id;
    let hits: Vec<(NodeId, usize)> = oracle
        .hits_at(point)
        .into_iter()
        .filter(|id| *id != root)
        .filter_map(|id| {
            let node = get_node_by_id(&state.document, &state.templates, id).ok()?;
            if !node.active || node.locked {
                return None;
            }
            let depth = get_depth(&state.document, &state.templates, id).ok()?;
            Some((id, depth))
        })
        .collect();

    let hit = match state.raycast_targeting {
        RaycastTargeting::Shallowest => hits.iter().min_by_key(|(_, depth)| *depth),
        RaycastTargeting::Deepest => hits.iter().rev().max_by_key(|(_, depth)| *depth),
    };
    hit.map(|(id, _)| *id)
}

// ─── Pointer ─────────────────────────────────────────────────────────────

fn pointer_down(state: &mut EditorState, position: Point, modifiers: Modifiers) {
    state.surface.pointer = position;
    state.surface.modifiers = modifiers;
    if state.cursor_mode != CursorMode::Cursor {
        return;
    }
    match state.hovered_node_id {
        Some(id) if modifiers.shift => state.toggle(id),
        Some(id) => state.select([id]),
        None if modifiers.shift => {}
        None => state.selection.clear(),
    }
}

/// Arm a handle gesture on the current selection; the next drag drives it.
fn arm(state: &mut EditorState, gesture: Gesture) {
    if state.selection.is_empty() {
        log::debug!("{gesture:?} needs a selection");
        return;
    }
    state.surface.gesture = gesture;
}

fn start_rotate(state: &mut EditorState, oracle: &dyn GeometryOracle) -> Result<()> {
    let [node_id] = state.selection.as_slice() else {
        log::debug!("rotate needs exactly one selected node");
        return Ok(());
    };
    let node_id = *node_id;
    let Some(rect) = oracle.bounding_rect(node_id) else {
        log::debug!("rotate: `{node_id}` has no rendered bounds");
        return Ok(());
    };
    let node = get_node_by_id(&state.document, &state.templates, node_id)?;
    let center = rect.center();
    state.surface.gesture = Gesture::Rotate {
        node_id,
        center,
        start_angle: angle_deg(center, state.surface.pointer),
        base_rotation: node.layer().rotation,
    };
    Ok(())
}

fn drag_start(
    state: &mut EditorState,
    position: Point,
    modifiers: Modifiers,
    oracle: &dyn GeometryOracle,
) -> Result<()> {
    state.surface.pointer = position;
    state.surface.modifiers = modifiers;
    state.surface.is_dragging = true;
    state.surface.movement = Vec2::ZERO;

    if state.surface.gesture != Gesture::Idle {
        // A handle gesture was armed by the preceding start event.
        return Ok(());
    }
    match state.cursor_mode {
        CursorMode::Cursor => {
            if modifiers.shift || state.selection.is_empty() {
                state.surface.gesture = Gesture::Marquee { origin: position };
                state.surface.marquee = Some(rect_from_points(position, position));
            } else {
                state.surface.gesture = Gesture::Translate;
            }
            Ok(())
        }
        CursorMode::Insert(ty) => insert_at(state, ty, position, oracle),
        CursorMode::Draw => start_draw(state, position, oracle),
        CursorMode::Path => {
            log::debug!("drag in path mode is handled by the host");
            Ok(())
        }
    }
}

/// Position relative to the root's rendered origin.
fn local(state: &EditorState, position: Point, oracle: &dyn GeometryOracle) -> Point {
    match oracle.bounding_rect(state.document.root_id) {
        Some(root) => Point::new(position.x - root.x0, position.y - root.y0),
        None => position,
    }
}

/// Create a node of `ty` under the root at `position` and start resizing it.
fn insert_at(state: &mut EditorState, ty: NodeType, position: Point, oracle: &dyn GeometryOracle) -> Result<()> {
    let Some(kind) = NodeKind::new_default(ty) else {
        log::debug!("{ty} cannot be inserted by drag");
        return Ok(());
    };
    let at = local(state, position, oracle);
    let size = state.config.insert_size;
    let mut node = Node::new(state.document.fresh_id(ty.as_str()), kind);
    let layer = node.layer_mut();
    layer.position = Position::Absolute;
    layer.left = Some(at.x);
    layer.top = Some(at.y);
    layer.width = Dimension::Fixed(size);
    layer.height = Dimension::Fixed(if ty == NodeType::Line { 0.0 } else { size });

    let id = node.id;
    let root = state.document.root_id;
    if !state.document.insert(root, node)? {
        log::debug!("root `{root}` cannot hold an inserted {ty}");
        return Ok(());
    }
    log::trace!("inserted {ty} `{id}` by drag");
    state.select([id]);
    state.cursor_mode = CursorMode::Cursor;
    state.surface.gesture = Gesture::Resize {
        anchor: ResizeAnchor::SE,
    };
    Ok(())
}

fn start_draw(state: &mut EditorState, position: Point, oracle: &dyn GeometryOracle) -> Result<()> {
    let Some(kind) = NodeKind::new_default(NodeType::Vector) else {
        return Ok(());
    };
    let mut node = Node::new(state.document.fresh_id("vector"), kind);
    let id = node.id;
    let origin = local(state, position, oracle);
    write_stroke(&mut node, origin, &[position]);

    let root = state.document.root_id;
    if !state.document.insert(root, node)? {
        log::debug!("root `{root}` cannot hold a drawing");
        return Ok(());
    }
    state.select([id]);
    state.surface.gesture = Gesture::Draw {
        node_id: id,
        origin,
        points: vec![position],
    };
    Ok(())
}

/// Fit the node to the drawn points and store them as one open path.
///
/// `origin` maps the first canvas point into the root's coordinate space.
fn write_stroke(node: &mut Node, origin: Point, points: &[Point]) {
    let Some(first) = points.first() else {
        return;
    };
    let (mut min, mut max) = (*first, *first);
    for p in points {
        min = Point::new(min.x.min(p.x), min.y.min(p.y));
        max = Point::new(max.x.max(p.x), max.y.max(p.y));
    }
    let d = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{cmd}{} {}", p.x - min.x, p.y - min.y)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let layer = node.layer_mut();
    layer.position = Position::Absolute;
    layer.left = Some(origin.x + (min.x - first.x));
    layer.top = Some(origin.y + (min.y - first.y));
    layer.width = Dimension::Fixed(max.x - min.x);
    layer.height = Dimension::Fixed(max.y - min.y);
    if let NodeKind::Vector(vector) = &mut node.kind {
        vector.paths = vec![VectorPath {
            d,
            fill_rule: Default::default(),
        }];
    }
}

fn drag(state: &mut EditorState, position: Point) -> Result<()> {
    let delta = position - state.surface.pointer;
    state.surface.pointer = position;
    state.surface.movement += delta;

    match state.surface.gesture.clone() {
        Gesture::Idle => Ok(()),
        Gesture::Translate => match state.selection.as_slice() {
            [only] => {
                let only = *only;
                update_node(state, only, &NodeAction::Transform(TransformOp::Translate { delta }))
            }
            many => {
                log::debug!("drag moves a single node, {} selected", many.len());
                Ok(())
            }
        },
        Gesture::Resize { anchor } => {
            let op = NodeAction::Transform(TransformOp::Resize { anchor, delta });
            for id in state.selection.clone() {
                update_node(state, id, &op)?;
            }
            Ok(())
        }
        Gesture::Rotate {
            node_id,
            center,
            start_angle,
            base_rotation,
        } => {
            let rotation = base_rotation + (angle_deg(center, position) - start_angle);
            update_node(
                state,
                node_id,
                &NodeAction::Change(NodeChange::Rotation(Change::Set(rotation))),
            )
        }
        Gesture::CornerRadius => {
            // The handle sits inside the top-right corner: dragging left grows the radius.
            for id in state.selection.clone() {
                drag_corner_radius(state, id, -round_half_up(delta.x))?;
            }
            Ok(())
        }
        Gesture::Marquee { origin } => {
            state.surface.marquee = Some(rect_from_points(origin, position));
            Ok(())
        }
        Gesture::Draw {
            node_id,
            origin,
            mut points,
        } => {
            points.push(position);
            let mut node = state.document.node(node_id)?.clone();
            write_stroke(&mut node, origin, &points);
            state.document.replace(node)?;
            state.surface.gesture = Gesture::Draw {
                node_id,
                origin,
                points,
            };
            Ok(())
        }
    }
}

/// Grow or shrink every corner by `d`, clamped to half of a fixed width.
fn drag_corner_radius(state: &mut EditorState, id: NodeId, d: f64) -> Result<()> {
    let node = get_node_by_id(&state.document, &state.templates, id)?;
    let Some(radius) = node.kind.corner_radius() else {
        log::debug!("{} `{id}` has no corner radius", node.node_type());
        return Ok(());
    };
    let limit = node.layer().width.fixed().map_or(f64::INFINITY, |w| (w / 2.0).max(0.0));
    let next = radius.map(|r| (r + d).clamp(0.0, limit));
    update_node(state, id, &NodeAction::Change(NodeChange::CornerRadii(next)))
}

/// Nearest integer, with halves going toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn drag_end(state: &mut EditorState, modifiers: Modifiers, oracle: &dyn GeometryOracle) {
    if let Gesture::Marquee { .. } = state.surface.gesture
        && let Some(rect) = state.surface.marquee
    {
        let candidates = marquee_candidates(state);
        let hits: Vec<NodeId> = oracle
            .hits_in(rect)
            .into_iter()
            .filter(|id| candidates.contains(id))
            .collect();
        if modifiers.shift {
            for id in hits {
                state.toggle(id);
            }
        } else {
            state.select(hits);
        }
    }
    state.end_gesture();
}

/// Nodes a marquee may select: the root's children, or every descendant
/// while targeting the deepest node. Locked and inactive nodes are skipped.
fn marquee_candidates(state: &EditorState) -> Vec<NodeId> {
    let document = &state.document;
    let root = document.root_id;
    let ids: Vec<NodeId> = match state.raycast_targeting {
        RaycastTargeting::Shallowest => document.children_of(root).to_vec(),
        RaycastTargeting::Deepest => document.subtree(root).into_iter().skip(1).collect(),
    };
    ids.into_iter()
        .filter(|id| document.get(*id).is_some_and(|n| n.active && !n.locked))
        .collect()
}

// ─── Keyboard ────────────────────────────────────────────────────────────

fn key_down(state: &mut EditorState, key: &str, modifiers: Modifiers, oracle: &dyn GeometryOracle) -> Result<()> {
    state.surface.modifiers = modifiers;
    if key == "Meta" {
        state.raycast_targeting = RaycastTargeting::Deepest;
        return Ok(());
    }
    let config = &state.config;
    let Some(shortcut) = ShortcutMap::resolve(key, modifiers, config.nudge_step, config.nudge_step_large) else {
        return Ok(());
    };
    if state.content_edit_mode.is_some() && shortcut != ShortcutAction::Escape {
        // Keys belong to the content editor.
        return Ok(());
    }

    let selection = Target::Selection;
    let action = match shortcut {
        ShortcutAction::SetCursorMode(mode) => {
            state.cursor_mode = mode;
            return Ok(());
        }
        ShortcutAction::Escape => {
            escape(state);
            return Ok(());
        }
        ShortcutAction::Delete => Action::Delete { target: selection },
        ShortcutAction::Nudge { axis, delta } => Action::Nudge {
            target: selection,
            axis,
            delta,
        },
        ShortcutAction::SelectAll => Action::SelectAll,
        ShortcutAction::Copy => Action::Copy { target: selection },
        ShortcutAction::Cut => Action::Cut { target: selection },
        ShortcutAction::Paste => Action::Paste,
        ShortcutAction::SendBackward => order(Order::Backward),
        ShortcutAction::BringForward => order(Order::Forward),
        ShortcutAction::SendToBack => order(Order::Back),
        ShortcutAction::BringToFront => order(Order::Front),
    };
    reducer::apply(state, action, oracle)
}

fn order(order: Order) -> Action {
    Action::Order {
        target: Target::Selection,
        order,
    }
}

/// Leave content editing first, then insert/draw mode, then the selection.
fn escape(state: &mut EditorState) {
    if state.content_edit_mode.is_some() {
        exit_content_edit_mode(state);
    } else if state.cursor_mode != CursorMode::Cursor {
        state.cursor_mode = CursorMode::Cursor;
    } else {
        state.selection.clear();
    }
}

// ─── Content editing ─────────────────────────────────────────────────────

fn try_enter_content_edit_mode(state: &mut EditorState) -> Result<()> {
    let &[id] = state.selection.as_slice() else {
        log::debug!("content edit needs exactly one selected node");
        return Ok(());
    };
    let node = get_node_by_id(&state.document, &state.templates, id)?;
    match &node.kind {
        NodeKind::Text(text) if text.text.is_literal() => {
            state.content_edit_mode = Some(ContentEditMode::Text);
        }
        NodeKind::Text(_) => log::debug!("`{id}` text is bound to an expression"),
        NodeKind::Vector(_) => {
            state.content_edit_mode = Some(ContentEditMode::Path);
            state.cursor_mode = CursorMode::Path;
        }
        other => log::debug!("{} `{id}` has no editable content", other.node_type()),
    }
    Ok(())
}

fn exit_content_edit_mode(state: &mut EditorState) {
    if state.content_edit_mode.take() == Some(ContentEditMode::Path) {
        state.cursor_mode = CursorMode::Cursor;
    }
}
