//! Integration tests: editor session (mm-editor ↔ mm-core).
//!
//! Drives the session the way a host would, through key names, pointer
//! events and JSON documents, and checks tree, layout and view together.

use mm_core::{CanvasView, Document, MindMapError, NodeId};
use mm_editor::{EditorIntent, InputEvent, MindMapEditor, Selection};
use pretty_assertions::assert_eq;

const TRIP: &str = include_str!("fixtures/weekend_trip.json");

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn trip_editor() -> MindMapEditor {
    let mut editor = MindMapEditor::default();
    editor.import_json(TRIP).unwrap();
    editor
}

// ─── Keyboard ───────────────────────────────────────────────────────────

#[test]
fn keyboard_builds_and_walks_a_tree() {
    init_logging();
    let mut editor = MindMapEditor::default();
    let root = editor.map().root_id();
    assert_eq!(editor.click(0.0, 0.0), Some(root));

    assert!(editor.handle_key("Tab"));
    let a = editor.selected().unwrap();
    assert!(editor.handle_key("Enter"));
    let b = editor.selected().unwrap();
    assert_eq!(editor.map().children_of(root), vec![a, b]);
    assert_eq!(editor.map().get(a).unwrap().y, -30.0);
    assert_eq!(editor.map().get(b).unwrap().y, 30.0);

    assert!(editor.handle_key("ArrowUp"));
    assert_eq!(editor.selected(), Some(a));
    assert!(editor.handle_key("ArrowLeft"));
    assert_eq!(editor.selected(), Some(root));
    // Equidistant children: the earlier one wins.
    assert!(editor.handle_key("ArrowRight"));
    assert_eq!(editor.selected(), Some(a));
    // Nothing further right.
    assert!(!editor.handle_key("ArrowRight"));
    assert_eq!(editor.selected(), Some(a));
}

#[test]
fn editing_swallows_structure_keys() {
    init_logging();
    let mut editor = MindMapEditor::default();
    editor.select(Some(editor.map().root_id())).unwrap();
    assert!(editor.handle_key("Tab"));
    let a = editor.selected().unwrap();

    assert!(editor.handle_key(" "));
    assert_eq!(editor.selection(), Selection::Editing(a));
    assert!(!editor.handle_key("Tab"));
    assert!(!editor.handle_key("Delete"));
    assert_eq!(editor.map().node_count(), 2);

    assert!(editor.handle_key("Escape"));
    assert_eq!(editor.selection(), Selection::Selected(a));
}

#[test]
fn delete_moves_selection_to_parent_and_root_survives() {
    init_logging();
    let mut editor = trip_editor();
    let id = NodeId::intern;
    editor.select(Some(id("tent"))).unwrap();

    assert!(editor.handle_key("Delete"));
    assert_eq!(editor.selected(), Some(id("packing")));
    assert!(!editor.map().contains(id("tent")));

    editor.select(Some(id("trip"))).unwrap();
    assert!(!editor.handle_key("Backspace"));
    assert!(!editor.apply(EditorIntent::AddSibling));
    assert_eq!(editor.map().node_count(), 3);
    editor.map().check_invariants().unwrap();
}

// ─── Pointer ────────────────────────────────────────────────────────────

#[test]
fn click_hit_tests_through_the_view() {
    let mut editor = trip_editor();
    editor.pan(100.0, 50.0);
    assert_eq!(editor.click(300.0, 80.0), Some(NodeId::intern("route")));
    assert_eq!(editor.click(900.0, 900.0), None);
    assert_eq!(editor.selection(), Selection::None);
}

#[test]
fn dragging_a_node_carries_its_subtree() {
    init_logging();
    let mut editor = trip_editor();
    let id = NodeId::intern;
    editor.zoom(1.0, None);
    assert_eq!(editor.view().scale, 2.0);

    // Packing sits at canvas (200, -30), i.e. screen (400, -60) at 2x.
    assert!(editor.handle_input(&InputEvent::PointerDown {
        x: 400.0,
        y: -60.0,
        clicks: 1
    }));
    assert_eq!(editor.selected(), Some(id("packing")));
    assert!(editor.handle_input(&InputEvent::PointerMove { x: 420.0, y: -60.0 }));
    editor.handle_input(&InputEvent::PointerUp { x: 420.0, y: -60.0 });

    assert_eq!(editor.map().get(id("packing")).unwrap().x, 210.0);
    assert_eq!(editor.map().get(id("tent")).unwrap().x, 410.0);
    assert_eq!(editor.map().get(id("route")).unwrap().x, 200.0);
}

#[test]
fn dragging_the_background_pans_and_wheel_zooms() {
    let mut editor = trip_editor();
    editor.handle_input(&InputEvent::PointerDown {
        x: 1000.0,
        y: 1000.0,
        clicks: 1,
    });
    editor.handle_input(&InputEvent::PointerMove {
        x: 1010.0,
        y: 995.0,
    });
    editor.handle_input(&InputEvent::PointerUp {
        x: 1010.0,
        y: 995.0,
    });
    assert_eq!(
        (editor.view().translate_x, editor.view().translate_y),
        (10.0, -5.0)
    );

    editor.handle_input(&InputEvent::Wheel {
        x: 0.0,
        y: 0.0,
        delta: 5.0,
    });
    assert_eq!(editor.view().scale, 3.0);
}

#[test]
fn double_click_edits_the_node() {
    let mut editor = trip_editor();
    editor.handle_input(&InputEvent::PointerDown {
        x: 200.0,
        y: 30.0,
        clicks: 2,
    });
    assert_eq!(
        editor.selection(),
        Selection::Editing(NodeId::intern("route"))
    );
}

// ─── Documents ──────────────────────────────────────────────────────────

#[test]
fn import_keeps_positions_and_merges_partial_config() {
    init_logging();
    let mut editor = MindMapEditor::default();
    editor.pan(10.0, 20.0);
    editor.select(Some(editor.map().root_id())).unwrap();
    editor.import_json(TRIP).unwrap();

    let route = editor.map().get(NodeId::intern("route")).unwrap();
    assert_eq!((route.x, route.y), (200.0, 30.0));
    assert_eq!(route.level, 1);
    assert_eq!(editor.layout_config().level_width, 250.0);
    assert_eq!(editor.layout_config().node_height, 60.0);
    // No canvas section: the previous view stays.
    assert_eq!(
        (editor.view().translate_x, editor.view().translate_y),
        (10.0, 20.0)
    );
    assert_eq!(editor.selection(), Selection::None);
}

#[test]
fn failed_import_changes_nothing() {
    init_logging();
    let mut editor = trip_editor();
    let route = NodeId::intern("route");
    editor.select(Some(route)).unwrap();
    let before = editor.export_json().unwrap();

    let mut bad_view = Document::from_json(TRIP).unwrap();
    bad_view.canvas = Some(CanvasView {
        scale: -1.0,
        ..CanvasView::default()
    });
    assert!(matches!(
        editor.import_document(&bad_view),
        Err(MindMapError::InvalidData(_))
    ));

    let duplicated = TRIP.replace("\"tent\"", "\"route\"");
    assert!(matches!(
        editor.import_json(&duplicated),
        Err(MindMapError::InvalidData(_))
    ));
    assert!(editor.import_json("{ not json").is_err());

    assert_eq!(editor.export_json().unwrap(), before);
    assert_eq!(editor.selected(), Some(route));
}

#[test]
fn export_then_import_restores_the_session() {
    let mut editor = trip_editor();
    editor.zoom(0.5, None);
    editor.relayout();
    let json = editor.export_json().unwrap();
    let nodes = editor.map().all_nodes();

    editor.new_document();
    assert_eq!(editor.map().node_count(), 1);
    assert_eq!(editor.view().scale, 1.0);
    assert_eq!(editor.layout_config().level_width, 250.0);

    editor.import_json(&json).unwrap();
    assert_eq!(editor.map().all_nodes(), nodes);
    assert_eq!(editor.view().scale, 1.5);
    let packing = editor.map().get(NodeId::intern("packing")).unwrap();
    assert_eq!(packing.x, 250.0);
}

#[test]
fn deepest_allowed_tree_survives_a_roundtrip() {
    init_logging();
    let mut editor = MindMapEditor::default();
    let max_depth = editor.settings().max_depth;
    editor.select(Some(editor.map().root_id())).unwrap();
    for _ in 0..max_depth {
        editor.add_child(None).unwrap();
    }
    let tip = editor.selected().unwrap();
    assert_eq!(editor.map().get(tip).unwrap().level as usize, max_depth);
    assert!(matches!(
        editor.add_child(None),
        Err(MindMapError::InvalidOperation(_))
    ));

    let json = editor.export_json().unwrap();
    let nodes = editor.map().all_nodes();
    editor.new_document();
    editor.import_json(&json).unwrap();
    assert_eq!(editor.map().all_nodes(), nodes);
    assert_eq!(editor.map().get(tip).unwrap().level as usize, max_depth);
}

#[test]
fn imported_sizes_match_text_and_style() {
    let editor = trip_editor();
    for id in editor.map().all_nodes() {
        let node = editor.map().get(id).unwrap();
        let mut fresh = node.clone();
        fresh.calculate_size();
        assert_eq!((node.width, node.height), (fresh.width, fresh.height), "{id}");
    }
}

#[test]
fn export_bounds_pad_the_visible_tree() {
    let editor = MindMapEditor::default();
    let root = editor.map().root();
    let bounds = editor.export_bounds();
    assert_eq!(bounds.width, root.width + 200.0);
    assert_eq!(bounds.height, root.height + 200.0);
    assert_eq!(bounds.x, -root.width / 2.0 - 100.0);
    assert_eq!(editor.render_boxes().len(), 1);
    assert!(editor.connectors().is_empty());
}
