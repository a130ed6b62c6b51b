//! Node schema for FC documents.
//!
//! A node is a tagged union over a closed set of variants. Every variant
//! carries a [`Layer`] (positioning, dimensions, opacity, rotation, z-index,
//! effects, free-form style); the remaining capabilities (fill, stroke,
//! corner radius, children, flex layout, text, link, image source, props)
//! are layered per variant and reached through the `*_mut` accessors on
//! [`NodeKind`], which return `None` when the variant lacks the capability.
//!
//! The JSON form is flat: `{ "id", "name", "type": "<tag>", ...fields }`.
//! Template overrides rely on that flatness: an override is a shallow patch
//! over the top-level keys of a node.

use crate::css::{parse_dimension, parse_padding};
use crate::id::{NodeId, TemplateId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

// ─── Colors & Paint ──────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let digits = hex
            .bytes()
            .map(hex_val)
            .collect::<Option<SmallVec<[u8; 8]>>>()?;

        let channels: SmallVec<[u8; 4]> = match digits.len() {
            3 | 4 => digits.iter().map(|d| d * 17).collect(),
            6 | 8 => digits.chunks(2).map(|p| p[0] << 4 | p[1]).collect(),
            _ => return None,
        };
        let a = channels.get(3).copied().unwrap_or(255);
        Some(Self::rgba(
            f32::from(channels[0]) / 255.0,
            f32::from(channels[1]) / 255.0,
            f32::from(channels[2]) / 255.0,
            f32::from(a) / 255.0,
        ))
    }

    /// Emit `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (to_byte(self.r), to_byte(self.g), to_byte(self.b), to_byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// A gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32, // 0.0 .. 1.0
    pub color: Color,
}

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    Solid {
        color: Color,
    },
    LinearGradient {
        angle: f32, // degrees
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Paint::Solid { color }
    }
}

// ─── Stroke ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke capability: paint, width and line cap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StrokeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Paint>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_cap: StrokeCap,
}

// ─── Corner radius ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CornerRadius {
    Uniform(f64),
    PerCorner {
        top_left: f64,
        top_right: f64,
        bottom_right: f64,
        bottom_left: f64,
    },
}

impl Default for CornerRadius {
    fn default() -> Self {
        CornerRadius::Uniform(0.0)
    }
}

impl CornerRadius {
    /// Apply `f` to every corner.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            CornerRadius::Uniform(r) => CornerRadius::Uniform(f(r)),
            CornerRadius::PerCorner {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            } => CornerRadius::PerCorner {
                top_left: f(top_left),
                top_right: f(top_right),
                bottom_right: f(bottom_right),
                bottom_left: f(bottom_left),
            },
        }
    }
}

// ─── Effects ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    DropShadow {
        dx: f64,
        dy: f64,
        blur: f64,
        #[serde(default)]
        spread: f64,
        color: Color,
    },
    Blur {
        radius: f64,
    },
}

// ─── Positioning & dimensions ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Absolute,
    Relative,
}

/// A CSS-style length: fixed units, percentage of the parent, or `auto`.
///
/// JSON: a number for fixed, a string (`"50%"`, `"auto"`, `"120px"`) otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    Fixed(f64),
    Percentage(f64),
    #[default]
    Auto,
}

impl Dimension {
    pub fn fixed(&self) -> Option<f64> {
        match self {
            Dimension::Fixed(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(v) => write!(f, "{v}"),
            Dimension::Percentage(v) => write!(f, "{v}%"),
            Dimension::Auto => f.write_str("auto"),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Fixed(v) => serializer.serialize_f64(*v),
            other => serializer.collect_str(other),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Css(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Dimension::Fixed(v)),
            Repr::Css(s) => parse_dimension(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Box padding in units. JSON: a number, a CSS shorthand string, or an object.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl<'de> Deserialize<'de> for Padding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Uniform(f64),
            Css(String),
            Sides {
                top: f64,
                right: f64,
                bottom: f64,
                left: f64,
            },
        }
        match Repr::deserialize(deserializer)? {
            Repr::Uniform(v) => Ok(Padding::uniform(v)),
            Repr::Css(s) => parse_padding(&s).map_err(serde::de::Error::custom),
            Repr::Sides {
                top,
                right,
                bottom,
                left,
            } => Ok(Padding {
                top,
                right,
                bottom,
                left,
            }),
        }
    }
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

/// Box capability shared by every node variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default)]
    pub width: Dimension,
    #[serde(default)]
    pub height: Dimension,
    #[serde(default = "one")]
    pub opacity: f64,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub effects: SmallVec<[Effect; 2]>,
    /// Free-form CSS properties passed through to the host renderer.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, Value>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            position: Position::Absolute,
            left: None,
            top: None,
            right: None,
            bottom: None,
            width: Dimension::Auto,
            height: Dimension::Auto,
            opacity: 1.0,
            rotation: 0.0,
            z_index: 0,
            effects: SmallVec::new(),
            style: BTreeMap::new(),
        }
    }
}

impl Layer {
    /// An absolutely positioned box with fixed size.
    pub fn fixed(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            width: Dimension::Fixed(width),
            height: Dimension::Fixed(height),
            ..Self::default()
        }
    }
}

// ─── Flex layout ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Children are positioned by their own `position` fields.
    #[default]
    Flow,
    Flex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainAxisAlignment {
    #[default]
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossAxisAlignment {
    #[default]
    Start,
    End,
    Center,
    Stretch,
}

/// Flex container capability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlexLayout {
    #[serde(default)]
    pub layout: LayoutMode,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub main_axis_alignment: MainAxisAlignment,
    #[serde(default)]
    pub cross_axis_alignment: CrossAxisAlignment,
    #[serde(default)]
    pub main_axis_gap: f64,
    #[serde(default)]
    pub cross_axis_gap: f64,
    #[serde(default)]
    pub padding: Padding,
}

// ─── Links ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_self")]
    SelfFrame,
    #[serde(rename = "_blank")]
    Blank,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default)]
    pub target: LinkTarget,
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignVertical {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Text content: a literal string or an expression bound to props at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Literal(String),
    Expression { expression: String },
}

impl Default for TextValue {
    fn default() -> Self {
        TextValue::Literal(String::new())
    }
}

impl TextValue {
    pub fn is_literal(&self) -> bool {
        matches!(self, TextValue::Literal(_))
    }
}

fn default_font_family() -> String {
    "Inter".into()
}

fn default_font_weight() -> u16 {
    400
}

fn default_font_size() -> f64 {
    14.0
}

// ─── Images & vectors ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectFit {
    Contain,
    #[default]
    Cover,
    Fill,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    #[default]
    Nonzero,
    Evenodd,
}

/// One SVG path of a vector node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPath {
    pub d: String,
    #[serde(default)]
    pub fill_rule: FillRule,
}

// ─── Component schema ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Image,
    Object,
}

/// A named input declared by a component or template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(rename = "type")]
    pub ty: PropertyType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

// ─── Node variants ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerNode {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(flatten)]
    pub stroke: StrokeStyle,
    #[serde(default)]
    pub corner_radius: CornerRadius,
    #[serde(flatten)]
    pub flex: FlexLayout,
    #[serde(flatten)]
    pub link: Link,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentNode {
    #[serde(flatten)]
    pub frame: ContainerNode,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(default)]
    pub text: TextValue,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_weight")]
    pub font_weight: u16,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub text_align_vertical: TextAlignVertical,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(flatten)]
    pub link: Link,
}

impl Default for TextNode {
    fn default() -> Self {
        Self {
            layer: Layer::default(),
            fill: Some(Paint::solid(Color::BLACK)),
            text: TextValue::default(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_size: default_font_size(),
            line_height: None,
            letter_spacing: None,
            text_align: TextAlign::default(),
            text_align_vertical: TextAlignVertical::default(),
            max_length: None,
            link: Link::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageNode {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default)]
    pub fit: ObjectFit,
    #[serde(default)]
    pub corner_radius: CornerRadius,
    #[serde(flatten)]
    pub stroke: StrokeStyle,
    #[serde(flatten)]
    pub link: Link,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RectangleNode {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(flatten)]
    pub stroke: StrokeStyle,
    #[serde(default)]
    pub corner_radius: CornerRadius,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EllipseNode {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(flatten)]
    pub stroke: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineNode {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(flatten)]
    pub stroke: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorNode {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    #[serde(flatten)]
    pub stroke: StrokeStyle,
    #[serde(default)]
    pub paths: Vec<VectorPath>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    #[serde(flatten)]
    pub layer: Layer,
    pub component_id: NodeId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,
}

/// Shallow patch over a node's top-level JSON keys.
pub type NodeOverride = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateInstanceNode {
    #[serde(flatten)]
    pub layer: Layer,
    pub template_id: TemplateId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,
    /// Per-template-node diffs; the template definition itself is never copied.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<NodeId, NodeOverride>,
}

// ─── Node ────────────────────────────────────────────────────────────────

/// Type tag of a node, without its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Container,
    Component,
    Text,
    Image,
    Rectangle,
    Ellipse,
    Line,
    Vector,
    Instance,
    TemplateInstance,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Container => "container",
            NodeType::Component => "component",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::Rectangle => "rectangle",
            NodeType::Ellipse => "ellipse",
            NodeType::Line => "line",
            NodeType::Vector => "vector",
            NodeType::Instance => "instance",
            NodeType::TemplateInstance => "template_instance",
        }
    }

    /// Whether nodes of this type own a `children` list.
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Container | NodeType::Component)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific node data, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Container(ContainerNode),
    Component(ComponentNode),
    Text(TextNode),
    Image(ImageNode),
    Rectangle(RectangleNode),
    Ellipse(EllipseNode),
    Line(LineNode),
    #[serde(alias = "svg", alias = "path")]
    Vector(VectorNode),
    Instance(InstanceNode),
    TemplateInstance(TemplateInstanceNode),
}

impl NodeKind {
    /// Default field values for a type that can be created without references.
    /// Instances need a component/template id and return `None`.
    pub fn new_default(ty: NodeType) -> Option<Self> {
        Some(match ty {
            NodeType::Container => NodeKind::Container(ContainerNode {
                fill: Some(Paint::solid(Color::WHITE)),
                ..ContainerNode::default()
            }),
            NodeType::Component => NodeKind::Component(ComponentNode::default()),
            NodeType::Text => NodeKind::Text(TextNode::default()),
            NodeType::Image => NodeKind::Image(ImageNode::default()),
            NodeType::Rectangle => NodeKind::Rectangle(RectangleNode {
                fill: Some(Paint::solid(Color::rgba(0.85, 0.85, 0.85, 1.0))),
                ..RectangleNode::default()
            }),
            NodeType::Ellipse => NodeKind::Ellipse(EllipseNode {
                fill: Some(Paint::solid(Color::rgba(0.85, 0.85, 0.85, 1.0))),
                ..EllipseNode::default()
            }),
            NodeType::Line => NodeKind::Line(LineNode {
                stroke: StrokeStyle {
                    stroke: Some(Paint::solid(Color::BLACK)),
                    stroke_width: 1.0,
                    stroke_cap: StrokeCap::Butt,
                },
                ..LineNode::default()
            }),
            NodeType::Vector => NodeKind::Vector(VectorNode::default()),
            NodeType::Instance | NodeType::TemplateInstance => return None,
        })
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Container(_) => NodeType::Container,
            NodeKind::Component(_) => NodeType::Component,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Image(_) => NodeType::Image,
            NodeKind::Rectangle(_) => NodeType::Rectangle,
            NodeKind::Ellipse(_) => NodeType::Ellipse,
            NodeKind::Line(_) => NodeType::Line,
            NodeKind::Vector(_) => NodeType::Vector,
            NodeKind::Instance(_) => NodeType::Instance,
            NodeKind::TemplateInstance(_) => NodeType::TemplateInstance,
        }
    }

    pub fn layer(&self) -> &Layer {
        match self {
            NodeKind::Container(n) => &n.layer,
            NodeKind::Component(n) => &n.frame.layer,
            NodeKind::Text(n) => &n.layer,
            NodeKind::Image(n) => &n.layer,
            NodeKind::Rectangle(n) => &n.layer,
            NodeKind::Ellipse(n) => &n.layer,
            NodeKind::Line(n) => &n.layer,
            NodeKind::Vector(n) => &n.layer,
            NodeKind::Instance(n) => &n.layer,
            NodeKind::TemplateInstance(n) => &n.layer,
        }
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        match self {
            NodeKind::Container(n) => &mut n.layer,
            NodeKind::Component(n) => &mut n.frame.layer,
            NodeKind::Text(n) => &mut n.layer,
            NodeKind::Image(n) => &mut n.layer,
            NodeKind::Rectangle(n) => &mut n.layer,
            NodeKind::Ellipse(n) => &mut n.layer,
            NodeKind::Line(n) => &mut n.layer,
            NodeKind::Vector(n) => &mut n.layer,
            NodeKind::Instance(n) => &mut n.layer,
            NodeKind::TemplateInstance(n) => &mut n.layer,
        }
    }

    pub fn fill_mut(&mut self) -> Option<&mut Option<Paint>> {
        match self {
            NodeKind::Container(n) => Some(&mut n.fill),
            NodeKind::Component(n) => Some(&mut n.frame.fill),
            NodeKind::Text(n) => Some(&mut n.fill),
            NodeKind::Rectangle(n) => Some(&mut n.fill),
            NodeKind::Ellipse(n) => Some(&mut n.fill),
            NodeKind::Vector(n) => Some(&mut n.fill),
            _ => None,
        }
    }

    pub fn stroke_mut(&mut self) -> Option<&mut StrokeStyle> {
        match self {
            NodeKind::Container(n) => Some(&mut n.stroke),
            NodeKind::Component(n) => Some(&mut n.frame.stroke),
            NodeKind::Image(n) => Some(&mut n.stroke),
            NodeKind::Rectangle(n) => Some(&mut n.stroke),
            NodeKind::Ellipse(n) => Some(&mut n.stroke),
            NodeKind::Line(n) => Some(&mut n.stroke),
            NodeKind::Vector(n) => Some(&mut n.stroke),
            _ => None,
        }
    }

    pub fn corner_radius(&self) -> Option<CornerRadius> {
        match self {
            NodeKind::Container(n) => Some(n.corner_radius),
            NodeKind::Component(n) => Some(n.frame.corner_radius),
            NodeKind::Image(n) => Some(n.corner_radius),
            NodeKind::Rectangle(n) => Some(n.corner_radius),
            _ => None,
        }
    }

    pub fn corner_radius_mut(&mut self) -> Option<&mut CornerRadius> {
        match self {
            NodeKind::Container(n) => Some(&mut n.corner_radius),
            NodeKind::Component(n) => Some(&mut n.frame.corner_radius),
            NodeKind::Image(n) => Some(&mut n.corner_radius),
            NodeKind::Rectangle(n) => Some(&mut n.corner_radius),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        match self {
            NodeKind::Container(n) => Some(&n.children),
            NodeKind::Component(n) => Some(&n.frame.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Container(n) => Some(&mut n.children),
            NodeKind::Component(n) => Some(&mut n.frame.children),
            _ => None,
        }
    }

    pub fn flex_mut(&mut self) -> Option<&mut FlexLayout> {
        match self {
            NodeKind::Container(n) => Some(&mut n.flex),
            NodeKind::Component(n) => Some(&mut n.frame.flex),
            _ => None,
        }
    }

    pub fn link_mut(&mut self) -> Option<&mut Link> {
        match self {
            NodeKind::Container(n) => Some(&mut n.link),
            NodeKind::Component(n) => Some(&mut n.frame.link),
            NodeKind::Text(n) => Some(&mut n.link),
            NodeKind::Image(n) => Some(&mut n.link),
            _ => None,
        }
    }

    pub fn props_mut(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match self {
            NodeKind::Instance(n) => Some(&mut n.props),
            NodeKind::TemplateInstance(n) => Some(&mut n.props),
            _ => None,
        }
    }
}

/// A single node in the document graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    /// Participates in the runtime tree.
    #[serde(default = "yes")]
    pub active: bool,
    /// Not selectable or editable in the editor.
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userdata: Option<Value>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// A node named after its type, active and unlocked.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: kind.node_type().as_str().to_string(),
            active: true,
            locked: false,
            userdata: None,
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn layer(&self) -> &Layer {
        self.kind.layer()
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        self.kind.layer_mut()
    }

    /// Child ids; empty for variants without children.
    pub fn children(&self) -> &[NodeId] {
        self.kind.children().unwrap_or(&[])
    }
}
