//! Node property reducer.
//!
//! Pure `(node, change) -> node'`, one branch per editable property. Each
//! branch narrows to the variants carrying the capability; a change the node
//! cannot hold leaves it untouched. Numeric properties accept both an
//! absolute `set` and a relative `delta`.

use crate::cmath::Axis;
use crate::css::{parse_dimension, parse_padding};
use crate::model::{
    CornerRadius, CrossAxisAlignment, Dimension, Direction, Effect, ImageNode, LayoutMode,
    LinkTarget, MainAxisAlignment, Node, NodeKind, ObjectFit, Padding, Paint, Position,
    StrokeCap, TextAlign, TextAlignVertical, TextNode, TextValue,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Add;

/// Line height assumed for text that does not declare one (CSS `normal`).
const NORMAL_LINE_HEIGHT: f64 = 1.2;

/// An absolute value or a relative delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Change<T> {
    Set(T),
    Delta(T),
}

impl<T: Add<Output = T> + Copy> Change<T> {
    pub fn apply(self, current: T) -> T {
        match self {
            Change::Set(v) => v,
            Change::Delta(d) => current + d,
        }
    }
}

/// One property-level edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "change", rename_all = "snake_case")]
pub enum NodeChange {
    Fill(Option<Paint>),
    Stroke(Option<Paint>),
    StrokeWidth(Change<f64>),
    StrokeCap(StrokeCap),
    Opacity(Change<f64>),
    /// Degrees, clockwise.
    Rotation(Change<f64>),
    /// Uniform radius; a delta shifts every corner.
    CornerRadius(Change<f64>),
    CornerRadii(CornerRadius),
    Fit(ObjectFit),
    Padding(Padding),
    Layout(LayoutMode),
    Direction(Direction),
    MainAxisAlignment(MainAxisAlignment),
    CrossAxisAlignment(CrossAxisAlignment),
    MainAxisGap(Change<f64>),
    CrossAxisGap(Change<f64>),
    FontFamily(String),
    FontWeight(Change<f64>),
    FontSize(Change<f64>),
    LineHeight(Change<f64>),
    LetterSpacing(Change<f64>),
    TextAlign(TextAlign),
    TextAlignVertical(TextAlignVertical),
    MaxLength(Option<u32>),
    Text(TextValue),
    Href(Option<String>),
    Target(LinkTarget),
    Src(Option<String>),
    Name(String),
    Active(bool),
    Locked(bool),
    Userdata(Option<Value>),
    /// Generic CSS key/value. `width`, `height` and `padding` are parsed into
    /// their typed fields; `None` removes the key.
    Style { key: String, value: Option<Value> },
    ZIndex(Change<i32>),
    Position(Position),
    Size { axis: Axis, value: Dimension },
    Effects(Vec<Effect>),
    /// Prop passed into a component or template instance; `None` removes it.
    Props { key: String, value: Option<Value> },
}

impl NodeChange {
    /// Snake-case tag, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            NodeChange::Fill(_) => "fill",
            NodeChange::Stroke(_) => "stroke",
            NodeChange::StrokeWidth(_) => "stroke_width",
            NodeChange::StrokeCap(_) => "stroke_cap",
            NodeChange::Opacity(_) => "opacity",
            NodeChange::Rotation(_) => "rotation",
            NodeChange::CornerRadius(_) => "corner_radius",
            NodeChange::CornerRadii(_) => "corner_radii",
            NodeChange::Fit(_) => "fit",
            NodeChange::Padding(_) => "padding",
            NodeChange::Layout(_) => "layout",
            NodeChange::Direction(_) => "direction",
            NodeChange::MainAxisAlignment(_) => "main_axis_alignment",
            NodeChange::CrossAxisAlignment(_) => "cross_axis_alignment",
            NodeChange::MainAxisGap(_) => "main_axis_gap",
            NodeChange::CrossAxisGap(_) => "cross_axis_gap",
            NodeChange::FontFamily(_) => "font_family",
            NodeChange::FontWeight(_) => "font_weight",
            NodeChange::FontSize(_) => "font_size",
            NodeChange::LineHeight(_) => "line_height",
            NodeChange::LetterSpacing(_) => "letter_spacing",
            NodeChange::TextAlign(_) => "text_align",
            NodeChange::TextAlignVertical(_) => "text_align_vertical",
            NodeChange::MaxLength(_) => "max_length",
            NodeChange::Text(_) => "text",
            NodeChange::Href(_) => "href",
            NodeChange::Target(_) => "target",
            NodeChange::Src(_) => "src",
            NodeChange::Name(_) => "name",
            NodeChange::Active(_) => "active",
            NodeChange::Locked(_) => "locked",
            NodeChange::Userdata(_) => "userdata",
            NodeChange::Style { .. } => "style",
            NodeChange::ZIndex(_) => "z_index",
            NodeChange::Position(_) => "position",
            NodeChange::Size { .. } => "size",
            NodeChange::Effects(_) => "effects",
            NodeChange::Props { .. } => "props",
        }
    }
}

/// Apply one property change. Unsupported combinations return the node unchanged.
#[must_use]
pub fn apply_change(node: &Node, change: &NodeChange) -> Node {
    let mut next = node.clone();
    if apply_in_place(&mut next, change) {
        next
    } else {
        log::debug!(
            "{} does not support `{}`; change ignored",
            node.node_type(),
            change.name()
        );
        node.clone()
    }
}

fn text_mut(kind: &mut NodeKind) -> Option<&mut TextNode> {
    match kind {
        NodeKind::Text(t) => Some(t),
        _ => None,
    }
}

fn image_mut(kind: &mut NodeKind) -> Option<&mut ImageNode> {
    match kind {
        NodeKind::Image(i) => Some(i),
        _ => None,
    }
}

/// Set a capability field if present; `false` when the variant lacks it.
fn set<T>(slot: Option<&mut T>, update: impl FnOnce(&mut T)) -> bool {
    match slot {
        Some(slot) => {
            update(slot);
            true
        }
        None => false,
    }
}

fn apply_in_place(node: &mut Node, change: &NodeChange) -> bool {
    let kind = &mut node.kind;
    match change {
        // ─── Paint ───────────────────────────────────────────────────────
        NodeChange::Fill(paint) => set(kind.fill_mut(), |f| *f = paint.clone()),
        NodeChange::Stroke(paint) => set(kind.stroke_mut(), |s| s.stroke = paint.clone()),
        NodeChange::StrokeWidth(c) => set(kind.stroke_mut(), |s| {
            s.stroke_width = c.apply(s.stroke_width).max(0.0);
        }),
        NodeChange::StrokeCap(cap) => set(kind.stroke_mut(), |s| s.stroke_cap = *cap),

        // ─── Layer ───────────────────────────────────────────────────────
        NodeChange::Opacity(c) => {
            let layer = kind.layer_mut();
            layer.opacity = c.apply(layer.opacity).clamp(0.0, 1.0);
            true
        }
        NodeChange::Rotation(c) => {
            let layer = kind.layer_mut();
            layer.rotation = c.apply(layer.rotation);
            true
        }
        NodeChange::ZIndex(c) => {
            let layer = kind.layer_mut();
            layer.z_index = c.apply(layer.z_index);
            true
        }
        NodeChange::Position(position) => {
            kind.layer_mut().position = *position;
            true
        }
        NodeChange::Size { axis, value } => {
            let layer = kind.layer_mut();
            match axis {
                Axis::X => layer.width = *value,
                Axis::Y => layer.height = *value,
            }
            true
        }
        NodeChange::Effects(effects) => {
            kind.layer_mut().effects = effects.iter().cloned().collect();
            true
        }
        NodeChange::Style { key, value } => apply_style(kind, key, value.as_ref()),

        // ─── Corner radius ───────────────────────────────────────────────
        NodeChange::CornerRadius(c) => set(kind.corner_radius_mut(), |r| {
            *r = match *c {
                Change::Set(v) => CornerRadius::Uniform(v.max(0.0)),
                Change::Delta(d) => r.map(|v| (v + d).max(0.0)),
            };
        }),
        NodeChange::CornerRadii(radii) => {
            set(kind.corner_radius_mut(), |r| *r = radii.map(|v| v.max(0.0)))
        }

        // ─── Flex ────────────────────────────────────────────────────────
        NodeChange::Padding(p) => set(kind.flex_mut(), |f| f.padding = *p),
        NodeChange::Layout(l) => set(kind.flex_mut(), |f| f.layout = *l),
        NodeChange::Direction(d) => set(kind.flex_mut(), |f| f.direction = *d),
        NodeChange::MainAxisAlignment(a) => set(kind.flex_mut(), |f| f.main_axis_alignment = *a),
        NodeChange::CrossAxisAlignment(a) => set(kind.flex_mut(), |f| f.cross_axis_alignment = *a),
        NodeChange::MainAxisGap(c) => set(kind.flex_mut(), |f| {
            f.main_axis_gap = c.apply(f.main_axis_gap).max(0.0);
        }),
        NodeChange::CrossAxisGap(c) => set(kind.flex_mut(), |f| {
            f.cross_axis_gap = c.apply(f.cross_axis_gap).max(0.0);
        }),

        // ─── Text ────────────────────────────────────────────────────────
        NodeChange::FontFamily(family) => set(text_mut(kind), |t| t.font_family = family.clone()),
        NodeChange::FontWeight(c) => set(text_mut(kind), |t| {
            t.font_weight = c.apply(f64::from(t.font_weight)).round().clamp(1.0, 1000.0) as u16;
        }),
        NodeChange::FontSize(c) => set(text_mut(kind), |t| {
            t.font_size = c.apply(t.font_size).max(1.0);
        }),
        NodeChange::LineHeight(c) => set(text_mut(kind), |t| {
            let current = t.line_height.unwrap_or(NORMAL_LINE_HEIGHT);
            t.line_height = Some(c.apply(current).max(0.0));
        }),
        NodeChange::LetterSpacing(c) => set(text_mut(kind), |t| {
            t.letter_spacing = Some(c.apply(t.letter_spacing.unwrap_or(0.0)));
        }),
        NodeChange::TextAlign(a) => set(text_mut(kind), |t| t.text_align = *a),
        NodeChange::TextAlignVertical(a) => set(text_mut(kind), |t| t.text_align_vertical = *a),
        NodeChange::MaxLength(n) => set(text_mut(kind), |t| t.max_length = *n),
        NodeChange::Text(value) => set(text_mut(kind), |t| t.text = value.clone()),

        // ─── Link ────────────────────────────────────────────────────────
        NodeChange::Href(href) => set(kind.link_mut(), |l| l.href = href.clone()),
        NodeChange::Target(target) => set(kind.link_mut(), |l| l.target = *target),

        // ─── Image ───────────────────────────────────────────────────────
        NodeChange::Src(src) => set(image_mut(kind), |i| i.src = src.clone()),
        NodeChange::Fit(fit) => set(image_mut(kind), |i| i.fit = *fit),

        // ─── Instance props ──────────────────────────────────────────────
        NodeChange::Props { key, value } => set(kind.props_mut(), |props| match value {
            Some(v) => {
                props.insert(key.clone(), v.clone());
            }
            None => {
                props.remove(key);
            }
        }),

        // ─── Node metadata ───────────────────────────────────────────────
        NodeChange::Name(name) => {
            node.name = name.clone();
            true
        }
        NodeChange::Active(active) => {
            node.active = *active;
            true
        }
        NodeChange::Locked(locked) => {
            node.locked = *locked;
            true
        }
        NodeChange::Userdata(data) => {
            node.userdata = data.clone();
            true
        }
    }
}

/// Route a style key to its typed field, falling back to the free-form map.
fn apply_style(kind: &mut NodeKind, key: &str, value: Option<&Value>) -> bool {
    let css = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match (key, value) {
        ("width" | "height", Some(v)) => {
            let Ok(dim) = parse_dimension(&css(v)) else {
                log::debug!("style `{key}` has an invalid dimension {v}");
                return false;
            };
            let layer = kind.layer_mut();
            if key == "width" {
                layer.width = dim;
            } else {
                layer.height = dim;
            }
            true
        }
        ("padding", Some(v)) => {
            let Ok(padding) = parse_padding(&css(v)) else {
                log::debug!("style `padding` has an invalid shorthand {v}");
                return false;
            };
            set(kind.flex_mut(), |f| f.padding = padding)
        }
        (_, Some(v)) => {
            kind.layer_mut().style.insert(key.to_string(), v.clone());
            true
        }
        (_, None) => kind.layer_mut().style.remove(key).is_some(),
    }
}
