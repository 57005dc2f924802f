#![allow(clippy::float_cmp)]

use editor::config::EditorConfig;
use editor::doc::Shape;

use super::*;

fn session() -> EditorSession {
    EditorSession::new(&EditorConfig::default()).unwrap()
}

fn run(json: &str) -> (EditorSession, ReplayReport) {
    let steps = parse(json).unwrap();
    let mut s = session();
    let report = replay(&mut s, &steps).unwrap();
    (s, report)
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parses_tagged_steps_with_defaults() {
    let steps = parse(
        r#"[
            {"op": "tool", "tool": "rectangle"},
            {"op": "pointer_down", "x": 1, "y": 2},
            {"op": "key", "key": "z", "modifiers": {"ctrl": true}},
            {"op": "filter", "request": {"filter": "reset"}},
            {"op": "resize_preset", "preset": "story"}
        ]"#,
    )
    .unwrap();
    assert_eq!(steps.len(), 5);
    assert!(matches!(steps[1], Step::PointerDown { button: Button::Primary, .. }));
    assert!(matches!(&steps[2], Step::Key { modifiers, .. } if modifiers.ctrl));
}

#[test]
fn rejects_unknown_op() {
    assert!(parse(r#"[{"op": "explode"}]"#).is_err());
}

// =============================================================
// Replay
// =============================================================

#[test]
fn drag_step_draws_rectangle() {
    let (s, report) = run(
        r#"[
            {"op": "tool", "tool": "rectangle"},
            {"op": "drag", "from": {"x": 10, "y": 10}, "to": {"x": 50, "y": 80}}
        ]"#,
    );
    let obj = s.scene().objects().next().unwrap();
    assert_eq!(obj.shape, Shape::Rectangle { width: 40.0, height: 70.0 });
    assert_eq!(report.commits, 1);
}

#[test]
fn undo_redo_steps_are_acknowledged() {
    let (s, report) = run(
        r#"[
            {"op": "element", "preset": "star"},
            {"op": "undo"},
            {"op": "redo"},
            {"op": "key", "key": "z", "modifiers": {"meta": true}}
        ]"#,
    );
    assert_eq!(report.restores, 3);
    assert!(!s.history().is_restoring());
    assert!(s.scene().is_empty());
    assert_eq!(s.history().index(), Some(0));
}

#[test]
fn silent_errors_are_skipped() {
    let (s, report) = run(r#"[{"op": "undo"}, {"op": "stroke", "points": [{"x": 1, "y": 1}]}]"#);
    assert_eq!(report.skipped, 2);
    assert_eq!(s.history().len(), 1);
}

#[test]
fn wrong_kind_stops_replay() {
    let steps = parse(
        r#"[
            {"op": "element", "preset": "rectangle"},
            {"op": "text", "text": "nope"},
            {"op": "clear"}
        ]"#,
    )
    .unwrap();
    let mut s = session();
    let err = replay(&mut s, &steps).unwrap_err();
    assert!(matches!(err, ScriptError::Step { index: 1, source: EditorError::WrongKind { .. } }));
    assert_eq!(s.scene().len(), 1);
}

#[test]
fn layer_rows_address_objects() {
    let (s, _) = run(
        r#"[
            {"op": "element", "preset": "rectangle"},
            {"op": "element", "preset": "circle"},
            {"op": "rename", "layer": 1, "name": "base"},
            {"op": "toggle_lock", "layer": 0},
            {"op": "select", "layer": 1}
        ]"#,
    );
    let layers = s.layers();
    assert_eq!(layers[1].name, "base");
    assert!(layers[0].locked);
    assert_eq!(s.selection(), Some(layers[1].id));
}

#[test]
fn missing_layer_row_is_an_error() {
    let steps = parse(r#"[{"op": "toggle_visibility", "layer": 3}]"#).unwrap();
    let mut s = session();
    let err = replay(&mut s, &steps).unwrap_err();
    assert!(matches!(err, ScriptError::NoLayer { index: 0, layer: 3 }));
}

#[test]
fn clipboard_and_canvas_steps() {
    let (s, _) = run(
        r##"[
            {"op": "element", "preset": "triangle"},
            {"op": "copy"},
            {"op": "paste"},
            {"op": "nudge", "dx": 5, "dy": 0},
            {"op": "background", "color": "#101010"},
            {"op": "resize", "width": 1920, "height": 1080}
        ]"##,
    );
    let lefts: Vec<f64> = s.scene().objects().map(|o| o.transform.left).collect();
    assert_eq!(lefts, vec![100.0, 125.0]);
    assert_eq!(s.scene().background, "#101010");
    assert_eq!((s.scene().width, s.scene().height), (1920, 1080));
}

#[test]
fn object_and_font_steps() {
    let (s, report) = run(
        r#"[
            {"op": "object", "shape": {"kind": "text", "text": "Hi", "font_size": 24}, "x": 10, "y": 20},
            {"op": "select", "layer": 0},
            {"op": "font", "size": 400, "family": "Georgia"}
        ]"#,
    );
    assert_eq!(report.commits, 2);
    let obj = s.scene().objects().next().unwrap();
    assert_eq!((obj.transform.left, obj.transform.top), (10.0, 20.0));
    assert_eq!(
        obj.shape,
        Shape::Text { text: "Hi".into(), font_size: 200.0, font_family: "Georgia".into() }
    );
}

#[test]
fn image_op_steps_replace_content() {
    let (s, _) = run(
        r#"[
            {"op": "image", "width": 800, "height": 600, "data": [1]},
            {"op": "remove_background", "result": [2, 3]},
            {"op": "element", "preset": "heart"},
            {"op": "enhance", "result": [4], "width": 1600, "height": 1200}
        ]"#,
    );
    assert_eq!(s.scene().len(), 1);
    let obj = s.scene().objects().next().unwrap();
    assert!(matches!(obj.shape, Shape::Image { ref data, .. } if *data == vec![4]));
    assert_eq!(s.scene().background, "#ffffff");
    assert_eq!(s.history().len(), 5);
}

#[test]
fn remove_background_without_image_selection_stops_replay() {
    let steps = parse(r#"[{"op": "element", "preset": "star"}, {"op": "remove_background"}]"#).unwrap();
    let mut s = session();
    let err = replay(&mut s, &steps).unwrap_err();
    assert!(matches!(err, ScriptError::Step { index: 1, source: EditorError::WrongKind { .. } }));
}
