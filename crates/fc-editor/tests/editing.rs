//! Integration tests: document reducer on a loaded canvas.
//!
//! Structure, transforms, arrangement, template overrides and clipboard,
//! all dispatched as `Action`s against layout computed from the document.

use fc_core::cmath::{AlignEdge, Alignment, Axis};
use fc_core::{
    Change, Dimension, Document, DocumentError, EditorConfig, NodeChange, NodeId, NodeKind, Rect, ResizeAnchor,
    TemplateRegistry, TextValue, TransformOp, Vec2, get_node_by_id,
};
use fc_editor::{
    Action, DeclaredLayout, Editor, EditorState, NodeAction, NodePrototype, Order, StaticGeometry, Target, reduce,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

fn state() -> EditorState {
    let _ = env_logger::builder().is_test(true).try_init();
    let document = Document::from_json(include_str!("fixtures/canvas.json")).unwrap();
    let templates = TemplateRegistry::from_json(include_str!("fixtures/templates.json")).unwrap();
    EditorState::new(document, Arc::new(templates), EditorConfig::default())
}

fn layout(state: &EditorState) -> DeclaredLayout {
    DeclaredLayout::new(&state.document, Rect::new(0.0, 0.0, 800.0, 600.0))
}

fn dispatch(state: &EditorState, action: Action) -> EditorState {
    let oracle = layout(state);
    reduce(state, action, &oracle).unwrap()
}

fn left(state: &EditorState, node: &str) -> Option<f64> {
    state.document.get(id(node)).unwrap().layer().left
}

// ─── Structure ───────────────────────────────────────────────────────────

#[test]
fn deleting_the_root_is_a_no_op() {
    let before = state();
    let after = dispatch(
        &before,
        Action::Delete {
            target: Target::Node(id("canvas")),
        },
    );
    assert_eq!(after.document, before.document);
}

#[test]
fn delete_removes_the_subtree_and_prunes_selection() {
    let mut s = state();
    s.select([id("swatch"), id("chip_a")]);
    let after = dispatch(
        &s,
        Action::Delete {
            target: Target::Node(id("panel")),
        },
    );
    assert!(!after.document.contains(id("panel")));
    assert!(!after.document.contains(id("swatch")));
    assert_eq!(after.document.parent_of(id("chip_a")), Some(id("canvas")));
    assert!(!after.document.children_of(id("canvas")).contains(&id("panel")));
    assert_eq!(after.selection.as_slice(), &[id("chip_a")]);
}

#[test]
fn failed_dispatch_keeps_the_snapshot() {
    let mut editor = Editor::new(state());
    let before = editor.state().document.clone();
    let err = editor
        .dispatch(
            Action::Delete {
                target: Target::Nodes(vec![id("chip_a"), id("ghost")]),
            },
            &StaticGeometry::new(),
        )
        .unwrap_err();
    assert_eq!(err, DocumentError::NodeNotFound(id("ghost")));
    assert_eq!(editor.state().document, before);
}

#[test]
fn order_moves_within_siblings() {
    let s = state();
    let after = dispatch(
        &s,
        Action::Order {
            target: Target::Node(id("chip_c")),
            order: Order::Back,
        },
    );
    assert_eq!(after.document.children_of(id("canvas"))[0], id("chip_c"));

    let after = dispatch(
        &after,
        Action::Order {
            target: Target::Node(id("chip_c")),
            order: Order::Forward,
        },
    );
    assert_eq!(after.document.children_of(id("canvas"))[1], id("chip_c"));
}

// ─── Transforms ──────────────────────────────────────────────────────────

fn resize(state: &EditorState, anchor: ResizeAnchor, dx: f64, dy: f64) -> EditorState {
    dispatch(
        state,
        Action::Node {
            node_id: id("swatch"),
            change: NodeAction::Transform(TransformOp::Resize {
                anchor,
                delta: Vec2::new(dx, dy),
            }),
        },
    )
}

#[test]
fn resize_se_keeps_the_origin() {
    let after = resize(&state(), ResizeAnchor::SE, 5.0, 10.0);
    let layer = after.document.get(id("swatch")).unwrap().layer().clone();
    assert_eq!((layer.left, layer.top), (Some(10.0), Some(50.0)));
    assert_eq!((layer.width, layer.height), (Dimension::Fixed(25.0), Dimension::Fixed(30.0)));
}

#[test]
fn resize_nw_keeps_the_far_corner() {
    let after = resize(&state(), ResizeAnchor::NW, 5.0, -10.0);
    let layer = after.document.get(id("swatch")).unwrap().layer().clone();
    assert_eq!((layer.left, layer.top), (Some(15.0), Some(40.0)));
    assert_eq!((layer.width, layer.height), (Dimension::Fixed(15.0), Dimension::Fixed(30.0)));

    // Past the opposite edge the size floors at the minimum; the far edge stays at x = 30.
    let after = resize(&after, ResizeAnchor::W, 40.0, 0.0);
    let layer = after.document.get(id("swatch")).unwrap().layer().clone();
    assert_eq!(layer.width, Dimension::Fixed(1.0));
    assert_eq!(layer.left, Some(29.0));
}

#[test]
fn nudge_moves_every_target() {
    let after = dispatch(
        &state(),
        Action::Nudge {
            target: Target::Nodes(vec![id("chip_a"), id("chip_b")]),
            axis: Axis::Y,
            delta: -4.0,
        },
    );
    for chip in ["chip_a", "chip_b"] {
        assert_eq!(after.document.get(id(chip)).unwrap().layer().top, Some(296.0));
    }
    assert_eq!(after.document.get(id("chip_c")).unwrap().layer().top, Some(300.0));
}

// ─── Arrangement ─────────────────────────────────────────────────────────

#[test]
fn single_node_aligns_to_its_parent() {
    // Panel spans 0..200, so its center is 100; the swatch center moves from 20 to 100.
    let after = dispatch(
        &state(),
        Action::Align {
            target: Target::Node(id("swatch")),
            alignment: Alignment {
                horizontal: AlignEdge::Center,
                vertical: AlignEdge::None,
            },
        },
    );
    assert_eq!(left(&after, "swatch"), Some(90.0));
    assert_eq!(after.document.get(id("swatch")).unwrap().layer().top, Some(50.0));
}

#[test]
fn many_nodes_align_to_their_union() {
    let after = dispatch(
        &state(),
        Action::Align {
            target: Target::Nodes(vec![id("chip_a"), id("chip_b"), id("chip_c")]),
            alignment: Alignment {
                horizontal: AlignEdge::Max,
                vertical: AlignEdge::None,
            },
        },
    );
    // Union right edge is 520.
    assert_eq!(left(&after, "chip_a"), Some(500.0));
    assert_eq!(left(&after, "chip_b"), Some(480.0));
    assert_eq!(left(&after, "chip_c"), Some(500.0));
}

#[test]
fn distribute_needs_three_nodes() {
    let s = state();
    let two = dispatch(
        &s,
        Action::DistributeEvenly {
            target: Target::Nodes(vec![id("chip_a"), id("chip_b")]),
            axis: Axis::X,
        },
    );
    assert_eq!(two.document, s.document);

    // Span 300..520 holds 80 of content, so each gap becomes 70.
    let three = dispatch(
        &s,
        Action::DistributeEvenly {
            target: Target::Nodes(vec![id("chip_c"), id("chip_a"), id("chip_b")]),
            axis: Axis::X,
        },
    );
    assert_eq!(left(&three, "chip_a"), Some(300.0));
    assert_eq!(left(&three, "chip_b"), Some(390.0));
    assert_eq!(left(&three, "chip_c"), Some(500.0));
}

#[test]
fn distribute_skips_overlapping_projections() {
    let s = state();
    // All three share the band 300..320 on the y axis.
    let after = dispatch(
        &s,
        Action::DistributeEvenly {
            target: Target::Nodes(vec![id("chip_a"), id("chip_b"), id("chip_c")]),
            axis: Axis::Y,
        },
    );
    assert_eq!(after.document, s.document);
}

// ─── Template overrides ──────────────────────────────────────────────────

fn title_font_size(state: &EditorState) -> f64 {
    let node = get_node_by_id(&state.document, &state.templates, id("card_title")).unwrap();
    match node.kind {
        NodeKind::Text(text) => text.font_size,
        other => panic!("expected text, got {}", other.node_type()),
    }
}

fn card_overrides(state: &EditorState) -> Vec<NodeId> {
    match &state.document.get(id("card")).unwrap().kind {
        NodeKind::TemplateInstance(instance) => instance.overrides.keys().copied().collect(),
        other => panic!("expected template instance, got {}", other.node_type()),
    }
}

#[test]
fn editing_a_template_node_writes_an_override() {
    let s = state();
    let set_size = |size: f64| Action::Node {
        node_id: id("card_title"),
        change: NodeAction::Change(NodeChange::FontSize(Change::Set(size))),
    };

    let edited = dispatch(&s, set_size(20.0));
    assert_eq!(title_font_size(&edited), 20.0);
    assert_eq!(card_overrides(&edited), vec![id("card_title")]);
    // The definition is shared and never written.
    assert!(Arc::ptr_eq(&edited.templates, &s.templates));

    // Back to the definition value: the override disappears.
    let restored = dispatch(&edited, set_size(14.0));
    assert_eq!(title_font_size(&restored), 14.0);
    assert_eq!(card_overrides(&restored), vec![]);
}

#[test]
fn template_override_action_targets_one_instance() {
    let s = state();
    let after = dispatch(
        &s,
        Action::TemplateOverride {
            template_instance_node_id: id("card"),
            node_id: id("card_title"),
            change: NodeAction::Change(NodeChange::Text(TextValue::Literal("Pricing".into()))),
        },
    );
    let title = get_node_by_id(&after.document, &after.templates, id("card_title")).unwrap();
    let NodeKind::Text(text) = &title.kind else {
        panic!("expected text");
    };
    assert_eq!(text.text, TextValue::Literal("Pricing".into()));
    assert_eq!(text.font_size, 14.0);

    let err = reduce(
        &s,
        Action::TemplateOverride {
            template_instance_node_id: id("panel"),
            node_id: id("card_title"),
            change: NodeAction::Change(NodeChange::FontSize(Change::Delta(2.0))),
        },
        &layout(&s),
    )
    .unwrap_err();
    assert_eq!(err, DocumentError::NotATemplateInstance(id("panel")));
}

// ─── Clipboard & insert ──────────────────────────────────────────────────

#[test]
fn successive_pastes_cascade() {
    let s = state();
    let copied = dispatch(
        &s,
        Action::Copy {
            target: Target::Node(id("swatch")),
        },
    );
    let first = dispatch(&copied, Action::Paste);
    let second = dispatch(&first, Action::Paste);

    let first_id = first.selection[0];
    let second_id = second.selection[0];
    assert_ne!(first_id, second_id);
    assert_ne!(first_id, id("swatch"));

    let origin = |state: &EditorState, node: NodeId| {
        let layer = state.document.get(node).unwrap().layer();
        (layer.left, layer.top)
    };
    assert_eq!(origin(&second, first_id), (Some(20.0), Some(60.0)));
    assert_eq!(origin(&second, second_id), (Some(30.0), Some(70.0)));
    assert_eq!(second.document.parent_of(second_id), Some(id("canvas")));
    // The source is untouched.
    assert_eq!(origin(&second, id("swatch")), (Some(10.0), Some(50.0)));
}

#[test]
fn inserted_prototypes_get_fresh_ids() {
    let prototype: NodePrototype = serde_json::from_value(serde_json::json!({
        "type": "container",
        "name": "Row",
        "children": [
            { "type": "text", "text": "Label" },
            { "type": "rectangle", "width": 10, "height": 10 }
        ]
    }))
    .unwrap();

    let s = state();
    let insert = || Action::Insert {
        prototype: prototype.clone(),
        parent: Some(id("panel")),
    };
    let after = dispatch(&dispatch(&s, insert()), insert());

    assert_eq!(after.document.nodes.len(), s.document.nodes.len() + 2 * prototype.node_count());
    let rows = &after.document.children_of(id("panel"))[1..];
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0], rows[1]);
    for row in rows {
        assert_eq!(after.document.get(*row).unwrap().name, "Row");
        assert_eq!(after.document.children_of(*row).len(), 2);
    }
}

#[test]
fn insert_under_a_leaf_is_ignored() {
    let s = state();
    let after = dispatch(
        &s,
        Action::Insert {
            prototype: NodePrototype::new(NodeKind::new_default(fc_core::NodeType::Rectangle).unwrap()),
            parent: Some(id("chip_a")),
        },
    );
    assert_eq!(after.document, s.document);
}
