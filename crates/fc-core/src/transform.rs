//! Node transform reducer: translate, move and anchored resize.
//!
//! Pure `(node, op) -> node'`. Operations that cannot apply to a node (no
//! positional fields, non-fixed dimensions) return the node unchanged.

use crate::cmath::Vec2;
use crate::model::{Dimension, Layer, Node, NodeType, Position};
use serde::{Deserialize, Serialize};

/// Edge or corner being dragged during a resize. The opposite edge stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeAnchor {
    N,
    S,
    E,
    W,
    NW,
    NE,
    SW,
    SE,
}

/// Which end of an axis moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MovingEdge {
    Start,
    End,
}

impl ResizeAnchor {
    fn horizontal(self) -> Option<MovingEdge> {
        match self {
            ResizeAnchor::W | ResizeAnchor::NW | ResizeAnchor::SW => Some(MovingEdge::Start),
            ResizeAnchor::E | ResizeAnchor::NE | ResizeAnchor::SE => Some(MovingEdge::End),
            ResizeAnchor::N | ResizeAnchor::S => None,
        }
    }

    fn vertical(self) -> Option<MovingEdge> {
        match self {
            ResizeAnchor::N | ResizeAnchor::NW | ResizeAnchor::NE => Some(MovingEdge::Start),
            ResizeAnchor::S | ResizeAnchor::SW | ResizeAnchor::SE => Some(MovingEdge::End),
            ResizeAnchor::E | ResizeAnchor::W => None,
        }
    }

    /// Whether both dimensions change.
    pub fn is_corner(self) -> bool {
        self.horizontal().is_some() && self.vertical().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOp {
    /// Shift the node's defined positional fields by `delta`.
    Translate { delta: Vec2 },
    /// Translate and pin the node to absolute positioning.
    Move { delta: Vec2 },
    /// Move the edge(s) named by `anchor` by `delta`.
    Resize { anchor: ResizeAnchor, delta: Vec2 },
}

/// Apply one transform to a node. `min_size` floors width and height during resize.
#[must_use]
pub fn apply_transform(node: &Node, op: &TransformOp, min_size: f64) -> Node {
    let mut next = node.clone();
    let changed = match *op {
        TransformOp::Translate { delta } => translate(next.layer_mut(), delta),
        TransformOp::Move { delta } => {
            let layer = next.layer_mut();
            let moved = translate(layer, delta);
            if moved {
                layer.position = Position::Absolute;
            }
            moved
        }
        TransformOp::Resize { anchor, delta } => {
            let is_line = node.node_type() == NodeType::Line;
            let layer = next.layer_mut();
            let x = anchor
                .horizontal()
                .is_some_and(|edge| resize_axis(&mut layer.width, &mut layer.left, &mut layer.right, edge, delta.x, min_size));
            // Lines have no thickness: only their length follows the pointer.
            let y = !is_line
                && anchor
                    .vertical()
                    .is_some_and(|edge| resize_axis(&mut layer.height, &mut layer.top, &mut layer.bottom, edge, delta.y, min_size));
            x || y
        }
    };
    if !changed {
        log::debug!("transform {op:?} does not apply to {}", node.id);
    }
    next
}

/// Add `delta` to whichever positional field each axis defines.
fn translate(layer: &mut Layer, delta: Vec2) -> bool {
    let x = shift(&mut layer.left, &mut layer.right, delta.x);
    let y = shift(&mut layer.top, &mut layer.bottom, delta.y);
    x || y
}

fn shift(start: &mut Option<f64>, end: &mut Option<f64>, d: f64) -> bool {
    match (start.as_mut(), end.as_mut()) {
        (Some(s), _) => {
            *s += d;
            true
        }
        (None, Some(e)) => {
            *e -= d;
            true
        }
        (None, None) => false,
    }
}

/// Resize one axis keeping the non-moving edge fixed.
fn resize_axis(
    size: &mut Dimension,
    start: &mut Option<f64>,
    end: &mut Option<f64>,
    edge: MovingEdge,
    d: f64,
    min_size: f64,
) -> bool {
    let Dimension::Fixed(current) = *size else {
        return false;
    };
    let requested = match edge {
        MovingEdge::End => current + d,
        MovingEdge::Start => current - d,
    };
    let next = requested.max(min_size);
    let growth = next - current;
    *size = Dimension::Fixed(next);

    match edge {
        // The start edge is fixed; only an end-anchored node needs its offset fixed up.
        MovingEdge::End => {
            if start.is_none()
                && let Some(e) = end.as_mut()
            {
                *e -= growth;
            }
        }
        MovingEdge::Start => {
            if let Some(s) = start.as_mut() {
                *s -= growth;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::{LineNode, NodeKind, RectangleNode, TextNode};
    use pretty_assertions::assert_eq;

    fn rect(left: f64, top: f64, w: f64, h: f64) -> Node {
        Node::new(
            NodeId::intern("tf_rect"),
            NodeKind::Rectangle(RectangleNode {
                layer: Layer::fixed(left, top, w, h),
                ..RectangleNode::default()
            }),
        )
    }

    fn geometry(node: &Node) -> (Option<f64>, Option<f64>, Dimension, Dimension) {
        let l = node.layer();
        (l.left, l.top, l.width, l.height)
    }

    fn resize(node: &Node, anchor: ResizeAnchor, dx: f64, dy: f64) -> Node {
        apply_transform(
            node,
            &TransformOp::Resize {
                anchor,
                delta: Vec2::new(dx, dy),
            },
            1.0,
        )
    }

    #[test]
    fn translate_adds_delta() {
        let node = rect(10.0, 20.0, 30.0, 40.0);
        let out = apply_transform(
            &node,
            &TransformOp::Translate {
                delta: Vec2::new(5.0, -5.0),
            },
            1.0,
        );
        assert_eq!(out.layer().left, Some(15.0));
        assert_eq!(out.layer().top, Some(15.0));
    }

    #[test]
    fn translate_right_anchored_node() {
        let mut node = rect(0.0, 0.0, 10.0, 10.0);
        node.layer_mut().left = None;
        node.layer_mut().right = Some(50.0);
        let out = apply_transform(
            &node,
            &TransformOp::Translate {
                delta: Vec2::new(5.0, 0.0),
            },
            1.0,
        );
        assert_eq!(out.layer().right, Some(45.0));
        assert_eq!(out.layer().left, None);
    }

    #[test]
    fn translate_without_position_is_noop() {
        let node = Node::new(NodeId::intern("tf_text"), NodeKind::Text(TextNode::default()));
        let out = apply_transform(
            &node,
            &TransformOp::Translate {
                delta: Vec2::new(5.0, 5.0),
            },
            1.0,
        );
        assert_eq!(out, node);
    }

    #[test]
    fn move_pins_relative_nodes() {
        let mut node = rect(0.0, 0.0, 10.0, 10.0);
        node.layer_mut().position = Position::Relative;
        let out = apply_transform(
            &node,
            &TransformOp::Move {
                delta: Vec2::new(1.0, 1.0),
            },
            1.0,
        );
        assert_eq!(out.layer().position, Position::Absolute);
        assert_eq!(out.layer().left, Some(1.0));
    }

    #[test]
    fn resize_se_keeps_origin() {
        let out = resize(&rect(10.0, 20.0, 100.0, 50.0), ResizeAnchor::SE, 15.0, -10.0);
        assert_eq!(
            geometry(&out),
            (Some(10.0), Some(20.0), Dimension::Fixed(115.0), Dimension::Fixed(40.0))
        );
    }

    #[test]
    fn resize_nw_keeps_bottom_right() {
        let out = resize(&rect(10.0, 20.0, 100.0, 50.0), ResizeAnchor::NW, 15.0, -10.0);
        assert_eq!(
            geometry(&out),
            (Some(25.0), Some(10.0), Dimension::Fixed(85.0), Dimension::Fixed(60.0))
        );
        // bottom-right corner = (110, 70) before and after
        assert_eq!(25.0 + 85.0, 110.0);
        assert_eq!(10.0 + 60.0, 70.0);
    }

    #[test]
    fn resize_clamps_and_fixes_opposite_edge() {
        let out = resize(&rect(10.0, 20.0, 100.0, 50.0), ResizeAnchor::W, 500.0, 0.0);
        let (left, _, width, _) = geometry(&out);
        assert_eq!(width, Dimension::Fixed(1.0));
        assert_eq!(left, Some(109.0)); // right edge stays at 110

        let out = resize(&rect(10.0, 20.0, 100.0, 50.0), ResizeAnchor::S, 0.0, -500.0);
        assert_eq!(
            geometry(&out),
            (Some(10.0), Some(20.0), Dimension::Fixed(100.0), Dimension::Fixed(1.0))
        );
    }

    #[test]
    fn edge_anchor_changes_one_dimension() {
        let out = resize(&rect(0.0, 0.0, 100.0, 50.0), ResizeAnchor::E, 10.0, 99.0);
        assert_eq!(out.layer().width, Dimension::Fixed(110.0));
        assert_eq!(out.layer().height, Dimension::Fixed(50.0));
        assert!(!ResizeAnchor::E.is_corner());
        assert!(ResizeAnchor::SW.is_corner());
    }

    #[test]
    fn resize_non_fixed_dimension_is_noop() {
        let mut node = rect(0.0, 0.0, 100.0, 50.0);
        node.layer_mut().width = Dimension::Percentage(50.0);
        let out = resize(&node, ResizeAnchor::E, 10.0, 0.0);
        assert_eq!(out, node);
    }

    #[test]
    fn lines_keep_zero_height() {
        let node = Node::new(
            NodeId::intern("tf_line"),
            NodeKind::Line(LineNode {
                layer: Layer::fixed(0.0, 0.0, 1.0, 0.0),
                ..LineNode::default()
            }),
        );
        let out = resize(&node, ResizeAnchor::SE, 40.0, 30.0);
        assert_eq!(out.layer().width, Dimension::Fixed(41.0));
        assert_eq!(out.layer().height, Dimension::Fixed(0.0));
    }
}
