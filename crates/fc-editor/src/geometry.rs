//! Geometry oracle: rendered bounding boxes and hit testing.
//!
//! The reducer never computes layout. Align, distribute, marquee selection
//! and raycasting ask an oracle for each node's rendered rectangle in canvas
//! space. Hosts implement [`GeometryOracle`] over their render tree;
//! [`DeclaredLayout`] derives rectangles from the document's declared fixed
//! geometry for headless use and tests.

use fc_core::cmath::intersects;
use fc_core::{Dimension, Document, Node, NodeId, Point, Rect};
use std::collections::HashMap;

pub trait GeometryOracle {
    /// Rendered bounds of `id`, `None` when the node is not rendered.
    fn bounding_rect(&self, id: NodeId) -> Option<Rect>;

    /// Every node under `point`, topmost (last painted) first.
    fn hits_at(&self, point: Point) -> Vec<NodeId>;

    /// Every node whose bounds intersect `rect`, in paint order.
    fn hits_in(&self, rect: Rect) -> Vec<NodeId>;
}

// ─── Static geometry ─────────────────────────────────────────────────────

/// Fixed rectangles supplied by the host. Later entries paint on top.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    rects: Vec<(NodeId, Rect)>,
}

impl StaticGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bounds of `id`; re-adding moves it to the top.
    pub fn insert(&mut self, id: NodeId, rect: Rect) {
        self.rects.retain(|(existing, _)| *existing != id);
        self.rects.push((id, rect));
    }

    #[must_use]
    pub fn with(mut self, id: NodeId, rect: Rect) -> Self {
        self.insert(id, rect);
        self
    }
}

impl GeometryOracle for StaticGeometry {
    fn bounding_rect(&self, id: NodeId) -> Option<Rect> {
        self.rects.iter().find(|(n, _)| *n == id).map(|(_, r)| *r)
    }

    fn hits_at(&self, point: Point) -> Vec<NodeId> {
        self.rects
            .iter()
            .rev()
            .filter(|(_, r)| contains(r, point))
            .map(|(id, _)| *id)
            .collect()
    }

    fn hits_in(&self, rect: Rect) -> Vec<NodeId> {
        self.rects
            .iter()
            .filter(|(_, r)| intersects(r, &rect))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Inclusive point containment (kurbo's `contains` excludes the far edges).
fn contains(rect: &Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

// ─── Declared layout ─────────────────────────────────────────────────────

/// Rectangles resolved from each node's declared position and size.
///
/// - The root fills the viewport unless it declares a fixed size.
/// - `left`/`top` offset from the parent's origin; `right`/`bottom` from its far edge.
/// - Fixed sizes are used as is, percentages resolve against the parent,
///   `auto` containers wrap their children and `auto` leaves are empty.
/// - Inactive nodes and their subtrees are not rendered.
#[derive(Debug, Clone, Default)]
pub struct DeclaredLayout {
    bounds: HashMap<NodeId, Rect>,
    /// Pre-order paint order: parents before children, later siblings on top.
    paint_order: Vec<NodeId>,
}

impl DeclaredLayout {
    #[must_use]
    pub fn new(document: &Document, viewport: Rect) -> Self {
        let mut layout = Self::default();
        let Some(root) = document.root() else {
            return layout;
        };
        let root_rect = Rect::new(
            viewport.x0,
            viewport.y0,
            viewport.x0 + fixed_or(root.layer().width, viewport.width()),
            viewport.y0 + fixed_or(root.layer().height, viewport.height()),
        );
        layout.bounds.insert(root.id, root_rect);
        layout.paint_order.push(root.id);
        layout.resolve_children(document, root, root_rect);
        layout
    }

    fn resolve_children(&mut self, document: &Document, parent: &Node, parent_rect: Rect) {
        for child_id in parent.children() {
            let Some(child) = document.get(*child_id) else {
                continue;
            };
            if !child.active {
                continue;
            }
            let rect = self.resolve_node(document, child, parent_rect);
            self.bounds.insert(child.id, rect);
        }
    }

    /// Resolve one node and its subtree; returns its rectangle.
    fn resolve_node(&mut self, document: &Document, node: &Node, parent: Rect) -> Rect {
        let layer = node.layer();
        let width = resolve_dimension(layer.width, parent.width());
        let height = resolve_dimension(layer.height, parent.height());

        let x = match (layer.left, layer.right, width) {
            (Some(left), _, _) => parent.x0 + left,
            (None, Some(right), Some(w)) => parent.x1 - right - w,
            _ => parent.x0,
        };
        let y = match (layer.top, layer.bottom, height) {
            (Some(top), _, _) => parent.y0 + top,
            (None, Some(bottom), Some(h)) => parent.y1 - bottom - h,
            _ => parent.y0,
        };

        let provisional = Rect::new(x, y, x + width.unwrap_or(0.0), y + height.unwrap_or(0.0));
        self.paint_order.push(node.id);
        self.resolve_children(document, node, provisional);

        if width.is_some() && height.is_some() {
            return provisional;
        }
        // Auto axes wrap the children that were just resolved.
        let content = node
            .children()
            .iter()
            .filter_map(|c| self.bounds.get(c))
            .copied()
            .reduce(|a, b| a.union(b));
        match content {
            Some(c) => Rect::new(
                x,
                y,
                if width.is_some() { provisional.x1 } else { c.x1.max(x) },
                if height.is_some() { provisional.y1 } else { c.y1.max(y) },
            ),
            None => provisional,
        }
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

fn fixed_or(dimension: Dimension, fallback: f64) -> f64 {
    dimension.fixed().unwrap_or(fallback)
}

fn resolve_dimension(dimension: Dimension, parent: f64) -> Option<f64> {
    match dimension {
        Dimension::Fixed(v) => Some(v),
        Dimension::Percentage(p) => Some(parent * p / 100.0),
        Dimension::Auto => None,
    }
}

impl GeometryOracle for DeclaredLayout {
    fn bounding_rect(&self, id: NodeId) -> Option<Rect> {
        self.bounds.get(&id).copied()
    }

    fn hits_at(&self, point: Point) -> Vec<NodeId> {
        self.paint_order
            .iter()
            .rev()
            .filter(|id| self.bounds.get(id).is_some_and(|r| contains(r, point)))
            .copied()
            .collect()
    }

    fn hits_in(&self, rect: Rect) -> Vec<NodeId> {
        self.paint_order
            .iter()
            .filter(|id| self.bounds.get(id).is_some_and(|r| intersects(r, &rect)))
            .copied()
            .collect()
    }
}
