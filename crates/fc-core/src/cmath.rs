//! Geometry kernel: vector and rectangle math for editor operations.
//!
//! Built on `kurbo` primitives. Every function is pure and total over valid
//! rectangles (non-negative width/height). Operations that need a minimum
//! number of inputs return identity deltas (`Vec2::ZERO`) below it.

pub use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A 2D axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Unit vector scaled by `amount` along this axis.
    pub fn vector(self, amount: f64) -> Vec2 {
        match self {
            Axis::X => Vec2::new(amount, 0.0),
            Axis::Y => Vec2::new(0.0, amount),
        }
    }
}

/// Alignment target along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignEdge {
    #[default]
    None,
    Min,
    Max,
    Center,
}

/// Alignment request for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: AlignEdge,
    pub vertical: AlignEdge,
}

// ─── Vectors ─────────────────────────────────────────────────────────────

pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

pub fn invert(v: Vec2) -> Vec2 {
    -v
}

/// Angle in degrees of `point` around `center`, clockwise from +x (screen space).
pub fn angle_deg(center: Point, point: Point) -> f64 {
    let d = point - center;
    d.y.atan2(d.x).to_degrees()
}

// ─── Rectangles ──────────────────────────────────────────────────────────

/// Build a rectangle from two arbitrary corners, normalizing min/max.
pub fn rect_from_points(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// Inclusive AABB overlap test; touching edges count as intersecting so a
/// zero-area marquee still selects what it sits on.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// Bounding box of all rectangles, `None` when empty.
pub fn union(rects: &[Rect]) -> Option<Rect> {
    rects.iter().copied().reduce(|acc, r| acc.union(r))
}

fn span(rect: &Rect, axis: Axis) -> (f64, f64) {
    match axis {
        Axis::X => (rect.x0, rect.x1),
        Axis::Y => (rect.y0, rect.y1),
    }
}

fn edge_value(min: f64, max: f64, edge: AlignEdge) -> Option<f64> {
    match edge {
        AlignEdge::None => None,
        AlignEdge::Min => Some(min),
        AlignEdge::Max => Some(max),
        AlignEdge::Center => Some((min + max) / 2.0),
    }
}

/// Delta that moves `rect` so its chosen edges line up with `anchor`'s.
pub fn align_to(rect: &Rect, anchor: &Rect, alignment: Alignment) -> Vec2 {
    let dx = match (
        edge_value(rect.x0, rect.x1, alignment.horizontal),
        edge_value(anchor.x0, anchor.x1, alignment.horizontal),
    ) {
        (Some(from), Some(to)) => to - from,
        _ => 0.0,
    };
    let dy = match (
        edge_value(rect.y0, rect.y1, alignment.vertical),
        edge_value(anchor.y0, anchor.y1, alignment.vertical),
    ) {
        (Some(from), Some(to)) => to - from,
        _ => 0.0,
    };
    Vec2::new(dx, dy)
}

/// Align every rectangle against the union of all of them.
///
/// Returns one delta per input, in input order. A single rectangle is its own
/// union, so it always gets a zero delta.
pub fn align(rects: &[Rect], alignment: Alignment) -> Vec<Vec2> {
    let Some(anchor) = union(rects) else {
        return Vec::new();
    };
    rects
        .iter()
        .map(|r| align_to(r, &anchor, alignment))
        .collect()
}

/// Indices of `rects` sorted by their start along `axis`.
fn sorted_by_start(rects: &[Rect], axis: Axis) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| span(&rects[a], axis).0.total_cmp(&span(&rects[b], axis).0));
    order
}

/// Gaps between consecutive rectangles along `axis` (sorted by start).
/// Negative gaps mean the neighbors overlap.
pub fn gaps(rects: &[Rect], axis: Axis) -> Vec<f64> {
    let order = sorted_by_start(rects, axis);
    order
        .windows(2)
        .map(|w| span(&rects[w[1]], axis).0 - span(&rects[w[0]], axis).1)
        .collect()
}

/// Common interval shared by every rectangle's projection onto `axis`,
/// or `None` when at least two projections are disjoint.
pub fn axis_projection_intersection(rects: &[Rect], axis: Axis) -> Option<(f64, f64)> {
    let mut iter = rects.iter().map(|r| span(r, axis));
    let (mut lo, mut hi) = iter.next()?;
    for (min, max) in iter {
        lo = lo.max(min);
        hi = hi.min(max);
        if lo > hi {
            return None;
        }
    }
    Some((lo, hi))
}

/// Redistribute rectangles along `axis` so every gap between neighbors is equal.
///
/// The outer span (earliest start to furthest end) stays fixed. Returns one
/// delta per input, in input order; fewer than 3 rectangles yields zero deltas.
pub fn distribute_evenly(rects: &[Rect], axis: Axis) -> Vec<Vec2> {
    let mut deltas = vec![Vec2::ZERO; rects.len()];
    if rects.len() < 3 {
        return deltas;
    }

    let order = sorted_by_start(rects, axis);
    let first = span(&rects[order[0]], axis).0;
    let last = rects
        .iter()
        .map(|r| span(r, axis).1)
        .fold(f64::NEG_INFINITY, f64::max);
    let total_size: f64 = rects
        .iter()
        .map(|r| {
            let (min, max) = span(r, axis);
            max - min
        })
        .sum();
    let gap = (last - first - total_size) / (rects.len() - 1) as f64;

    let mut cursor = first;
    for &i in &order {
        let (min, max) = span(&rects[i], axis);
        deltas[i] = axis.vector(cursor - min);
        cursor += (max - min) + gap;
    }
    deltas
}
