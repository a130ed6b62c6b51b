//! Document reducer: the single mutation entry point.
//!
//! `reduce` applies one [`Action`] to a draft copy of the session state and
//! returns the new snapshot. A structural failure aborts the transition with
//! an error and the caller keeps the previous snapshot. Policy no-ops (delete
//! the root, align an empty target set, rename onto a taken name, ...) return
//! the state unchanged and are logged at debug level.

use crate::action::{Action, NodeAction, Order, Target};
use crate::clipboard;
use crate::geometry::GeometryOracle;
use crate::input::SurfaceEvent;
use crate::insert::{NodePrototype, insert_prototype};
use crate::schema::apply_schema;
use crate::state::{CursorMode, EditorState};
use crate::surface;
use crate::throttle::RaycastThrottle;
use fc_core::cmath::{self, Alignment, Axis};
use fc_core::resolve::{diff_override, instance_of, owning_template, resolve_in_instance, template_instance};
use fc_core::{
    DocumentError, Node, NodeId, NodeKind, Point, Rect, Result, TransformOp, Vec2, apply_change,
    apply_transform, get_parent_id,
};
use std::time::Instant;

/// Apply `action` to a copy of `state`.
///
/// # Errors
/// Any [`DocumentError`] raised by the transition; `state` is never modified.
pub fn reduce(state: &EditorState, action: Action, oracle: &dyn GeometryOracle) -> Result<EditorState> {
    let mut draft = state.clone();
    apply(&mut draft, action, oracle)?;
    Ok(draft)
}

/// Apply `action` in place. On error `state` may be partially updated; use
/// [`reduce`] to keep the previous snapshot.
///
/// # Errors
/// Any [`DocumentError`] raised by the transition.
pub fn apply(state: &mut EditorState, action: Action, oracle: &dyn GeometryOracle) -> Result<()> {
    let name = action.name();
    log::trace!("action {name}");
    let result = match action {
        Action::Copy { target } => {
            let targets = state.targets(&target);
            clipboard::copy(state, &targets)
        }
        Action::Cut { target } => {
            let targets = state.targets(&target);
            clipboard::cut(state, &targets)
        }
        Action::Paste => clipboard::paste(state).map(|_| ()),
        Action::Delete { target } => delete(state, &target),
        Action::Nudge {
            target,
            axis,
            delta,
        } => nudge(state, &target, axis, delta),
        Action::Align { target, alignment } => align(state, &target, alignment, oracle),
        Action::DistributeEvenly { target, axis } => distribute(state, &target, axis, oracle),
        Action::Insert { prototype, parent } => insert(state, &prototype, parent),
        Action::Node { node_id, change } => update_node(state, node_id, &change),
        Action::Order { target, order } => reorder(state, &target, order),
        Action::TemplateOverride {
            template_instance_node_id,
            node_id,
            change,
        } => edit_override(state, template_instance_node_id, node_id, &change),
        Action::Schema { change } => apply_schema(&mut state.document, &change),
        Action::Select { ids } => {
            select(state, ids);
            Ok(())
        }
        Action::Blur => {
            state.selection.clear();
            Ok(())
        }
        Action::SelectAll => {
            select_all(state);
            Ok(())
        }
        Action::Hover { node_id } => {
            state.hovered_node_id = node_id;
            Ok(())
        }
        Action::Surface { event } => surface::apply_event(state, event, oracle),
    };
    if let Err(err) = &result {
        log::warn!("{name} failed: {err}");
    }
    result
}

// ─── Node updates ────────────────────────────────────────────────────────

fn apply_node_action(node: &Node, action: &NodeAction, min_size: f64) -> Node {
    match action {
        NodeAction::Change(change) => apply_change(node, change),
        NodeAction::Transform(op) => apply_transform(node, op, min_size),
    }
}

/// Apply a node action to a document node, or to a template node through the
/// override of the instance that stamps its template.
pub(crate) fn update_node(state: &mut EditorState, id: NodeId, action: &NodeAction) -> Result<()> {
    if let Some(node) = state.document.get(id) {
        let next = apply_node_action(node, action, state.config.min_size);
        return state.document.replace(next);
    }
    let template_id = owning_template(&state.templates, id)?.id;
    let instance =
        instance_of(&state.document, template_id).ok_or(DocumentError::TemplateInstanceNotFound(template_id))?;
    edit_override(state, instance, id, action)
}

/// Edit the merged value of a template node and store only the difference
/// from its definition. An override equal to the definition is removed.
fn edit_override(
    state: &mut EditorState,
    instance_id: NodeId,
    node_id: NodeId,
    action: &NodeAction,
) -> Result<()> {
    let current = resolve_in_instance(&state.document, &state.templates, instance_id, node_id)?;
    let updated = apply_node_action(&current, action, state.config.min_size);

    let template_id = template_instance(&state.document, instance_id)?.template_id;
    let base = state
        .templates
        .get(template_id)
        .and_then(|t| t.nodes.get(&node_id))
        .ok_or(DocumentError::NodeNotFound(node_id))?;
    let patch = diff_override(base, &updated)?;

    let Some(NodeKind::TemplateInstance(instance)) = state.document.get_mut(instance_id).map(|n| &mut n.kind)
    else {
        return Err(DocumentError::NotATemplateInstance(instance_id));
    };
    if patch.is_empty() {
        instance.overrides.remove(&node_id);
    } else {
        instance.overrides.insert(node_id, patch);
    }
    Ok(())
}

fn translate_all(state: &mut EditorState, moves: impl IntoIterator<Item = (NodeId, Vec2)>) -> Result<()> {
    for (id, delta) in moves {
        if delta == Vec2::ZERO {
            continue;
        }
        update_node(state, id, &NodeAction::Transform(TransformOp::Translate { delta }))?;
    }
    Ok(())
}

// ─── Structure ───────────────────────────────────────────────────────────

fn delete(state: &mut EditorState, target: &Target) -> Result<()> {
    let targets = state.targets(target);
    for id in &targets {
        state.document.node(*id)?;
    }
    let root = state.document.root_id;
    for id in targets {
        if id == root {
            log::debug!("refusing to delete root `{root}`");
            continue;
        }
        // Already gone when an earlier target was its ancestor.
        if state.document.contains(id) {
            state.document.remove_subtree(id)?;
        }
    }
    state.prune_missing();
    Ok(())
}

fn insert(state: &mut EditorState, prototype: &NodePrototype, parent: Option<NodeId>) -> Result<()> {
    let parent = parent.unwrap_or(state.document.root_id);
    if insert_prototype(&mut state.document, parent, prototype)?.is_some() {
        state.cursor_mode = CursorMode::Cursor;
        state.selection.clear();
    }
    Ok(())
}

fn reorder(state: &mut EditorState, target: &Target, order: Order) -> Result<()> {
    for id in state.targets(target) {
        state.document.node(id)?;
        let changed = match order {
            Order::Back => state.document.send_to_back(id),
            Order::Front => state.document.bring_to_front(id),
            Order::Backward => state.document.send_backward(id),
            Order::Forward => state.document.bring_forward(id),
        };
        if !changed {
            log::debug!("order {order:?} leaves `{id}` in place");
        }
    }
    Ok(())
}

// ─── Geometry ────────────────────────────────────────────────────────────

fn nudge(state: &mut EditorState, target: &Target, axis: Axis, delta: f64) -> Result<()> {
    let offset = axis.vector(delta);
    let targets = state.targets(target);
    translate_all(state, targets.into_iter().map(|id| (id, offset)))
}

/// Targets paired with their rendered bounds; unrendered nodes are skipped.
fn measure(targets: &[NodeId], oracle: &dyn GeometryOracle) -> (Vec<NodeId>, Vec<Rect>) {
    targets
        .iter()
        .filter_map(|&id| match oracle.bounding_rect(id) {
            Some(rect) => Some((id, rect)),
            None => {
                log::debug!("`{id}` has no rendered bounds");
                None
            }
        })
        .unzip()
}

fn align(state: &mut EditorState, target: &Target, alignment: Alignment, oracle: &dyn GeometryOracle) -> Result<()> {
    let targets = state.targets(target);
    let moves: Vec<(NodeId, Vec2)> = match targets.as_slice() {
        [] => {
            log::debug!("align: nothing to align");
            return Ok(());
        }
        [only] => {
            let only = *only;
            let Some(parent) = get_parent_id(&state.document, &state.templates, only)? else {
                log::debug!("align: root `{only}` has no parent");
                return Ok(());
            };
            let (Some(rect), Some(anchor)) = (oracle.bounding_rect(only), oracle.bounding_rect(parent)) else {
                log::debug!("align: `{only}` or its parent has no rendered bounds");
                return Ok(());
            };
            vec![(only, cmath::align_to(&rect, &anchor, alignment))]
        }
        many => {
            let (ids, rects) = measure(many, oracle);
            ids.into_iter().zip(cmath::align(&rects, alignment)).collect()
        }
    };
    translate_all(state, moves)
}

fn distribute(state: &mut EditorState, target: &Target, axis: Axis, oracle: &dyn GeometryOracle) -> Result<()> {
    let targets = state.targets(target);
    let (ids, rects) = measure(&targets, oracle);
    if rects.len() < 3 {
        log::debug!("distribute: needs 3 measured nodes, got {}", rects.len());
        return Ok(());
    }
    if cmath::axis_projection_intersection(&rects, axis).is_some() {
        log::debug!("distribute: every node overlaps along {axis:?}");
        return Ok(());
    }
    let deltas = cmath::distribute_evenly(&rects, axis);
    translate_all(state, ids.into_iter().zip(deltas))
}

// ─── Selection ───────────────────────────────────────────────────────────

fn select(state: &mut EditorState, ids: Vec<NodeId>) {
    let (known, unknown): (Vec<NodeId>, Vec<NodeId>) =
        ids.into_iter().partition(|id| state.document.contains(*id));
    if !unknown.is_empty() {
        log::debug!("select: ignoring {} unknown id(s)", unknown.len());
    }
    state.select(known);
}

/// Select every unlocked child of the root.
fn select_all(state: &mut EditorState) {
    let document = &state.document;
    let ids: Vec<NodeId> = document
        .children_of(document.root_id)
        .iter()
        .copied()
        .filter(|id| document.get(*id).is_some_and(|n| !n.locked))
        .collect();
    state.select(ids);
}

// ─── Editor ──────────────────────────────────────────────────────────────

/// Owns the current snapshot and commits a transition only when it succeeds.
#[derive(Debug, Clone)]
pub struct Editor {
    state: EditorState,
    throttle: RaycastThrottle,
}

impl Editor {
    pub fn new(state: EditorState) -> Self {
        let throttle = RaycastThrottle::from_millis(state.config.raycast_interval_ms);
        Self { state, throttle }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn into_state(self) -> EditorState {
        self.state
    }

    /// # Errors
    /// Any [`DocumentError`] raised by the transition; the snapshot is kept.
    pub fn dispatch(&mut self, action: Action, oracle: &dyn GeometryOracle) -> Result<()> {
        self.state = reduce(&self.state, action, oracle)?;
        Ok(())
    }

    pub fn dispatch_event(&mut self, event: SurfaceEvent, oracle: &dyn GeometryOracle) -> Result<()> {
        self.dispatch(Action::Surface { event }, oracle)
    }

    /// Track the pointer and raycast the hovered node at most once per interval.
    ///
    /// # Errors
    /// Any [`DocumentError`] raised by the raycast.
    pub fn pointer_move(&mut self, position: Point, now: Instant, oracle: &dyn GeometryOracle) -> Result<()> {
        self.dispatch_event(SurfaceEvent::PointerMove { position }, oracle)?;
        if self.throttle.ready(now) {
            self.dispatch_event(SurfaceEvent::Raycast, oracle)?;
        }
        Ok(())
    }
}
