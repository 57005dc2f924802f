#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn rect(left: f64, top: f64, w: f64, h: f64) -> SceneObject {
    SceneObject::new(Shape::Rectangle { width: w, height: h }, Transform::at(left, top), Style::filled("#ff0000"))
}

fn scene_with(n: usize) -> (Scene, Vec<ObjectId>) {
    let mut scene = Scene::new(800, 600, "#ffffff");
    let ids = (0..n).map(|_| scene.add(rect(0.0, 0.0, 10.0, 10.0))).collect();
    (scene, ids)
}

fn order(scene: &Scene) -> Vec<ObjectId> {
    scene.objects().map(|o| o.id).collect()
}

// =============================================================
// Shape
// =============================================================

#[test]
fn ellipse_extent_is_diameter() {
    assert_eq!(Shape::Ellipse { rx: 10.0, ry: 5.0 }.extent(), (20.0, 10.0));
}

#[test]
fn path_extent_is_max_point() {
    let shape = Shape::Path { points: vec![Point::new(0.0, 3.0), Point::new(12.0, 1.0)], closed: false };
    assert_eq!(shape.extent(), (12.0, 3.0));
}

#[test]
fn text_extent_uses_longest_line() {
    let shape = Shape::Text { text: "ab\nabcd".into(), font_size: 10.0, font_family: "Arial".into() };
    let (w, h) = shape.extent();
    assert!((w - 4.0 * 10.0 * GLYPH_WIDTH_RATIO).abs() < 1e-9);
    assert!((h - 2.0 * 10.0 * LINE_HEIGHT_RATIO).abs() < 1e-9);
}

#[test]
fn shape_serializes_with_kind_tag() {
    let json = serde_json::to_value(Shape::Rectangle { width: 1.0, height: 2.0 }).unwrap();
    assert_eq!(json["kind"], "rectangle");
}

#[test]
fn image_filters_default_when_missing() {
    let shape: Shape =
        serde_json::from_str(r#"{"kind":"image","data":[1,2],"width":3.0,"height":4.0}"#).unwrap();
    let Shape::Image { filters, .. } = shape else { panic!("expected image") };
    assert!(filters.is_empty());
}

// =============================================================
// SceneObject
// =============================================================

#[test]
fn bounds_apply_scale() {
    let mut obj = rect(5.0, 6.0, 10.0, 20.0);
    obj.transform.scale_x = 2.0;
    obj.transform.scale_y = -0.5;
    let b = obj.bounds();
    assert_eq!((b.x, b.y, b.width, b.height), (5.0, 6.0, 20.0, 10.0));
    assert_eq!(b.center(), Point::new(15.0, 11.0));
}

#[test]
fn duplicate_changes_only_id() {
    let mut obj = rect(1.0, 2.0, 3.0, 4.0);
    obj.name = "hero".into();
    obj.locked = true;
    let copy = obj.duplicate();
    assert_ne!(copy.id, obj.id);
    assert_eq!(SceneObject { id: obj.id, ..copy }, obj);
}

// =============================================================
// Scene: add / remove / replace
// =============================================================

#[test]
fn add_names_objects_by_kind_and_position() {
    let mut scene = Scene::new(100, 100, "#fff");
    let a = scene.add(rect(0.0, 0.0, 1.0, 1.0));
    let b = scene.add(SceneObject::new(Shape::Ellipse { rx: 1.0, ry: 1.0 }, Transform::default(), Style::default()));
    assert_eq!(scene.get(&a).unwrap().name, "rect 1");
    assert_eq!(scene.get(&b).unwrap().name, "ellipse 2");
}

#[test]
fn add_keeps_explicit_name() {
    let mut scene = Scene::new(100, 100, "#fff");
    let mut obj = rect(0.0, 0.0, 1.0, 1.0);
    obj.name = "logo".into();
    let id = scene.add(obj);
    assert_eq!(scene.get(&id).unwrap().name, "logo");
}

#[test]
fn add_existing_id_replaces_old_entry() {
    let mut scene = Scene::new(100, 100, "#fff");
    let obj = rect(0.0, 0.0, 1.0, 1.0);
    scene.add(obj.clone());
    scene.add(obj);
    assert_eq!(scene.len(), 1);
}

#[test]
fn remove_returns_object() {
    let (mut scene, ids) = scene_with(2);
    assert_eq!(scene.remove(&ids[0]).map(|o| o.id), Some(ids[0]));
    assert!(scene.remove(&ids[0]).is_none());
    assert_eq!(order(&scene), vec![ids[1]]);
}

#[test]
fn replace_keeps_paint_position() {
    let (mut scene, ids) = scene_with(3);
    let replacement = rect(9.0, 9.0, 1.0, 1.0);
    let new_id = replacement.id;
    assert!(scene.replace(&ids[1], replacement));
    assert_eq!(order(&scene), vec![ids[0], new_id, ids[2]]);
}

#[test]
fn replace_unknown_id_is_false() {
    let (mut scene, _) = scene_with(1);
    assert!(!scene.replace(&Uuid::new_v4(), rect(0.0, 0.0, 1.0, 1.0)));
    assert_eq!(scene.len(), 1);
}

#[test]
fn clear_keeps_canvas_attributes() {
    let (mut scene, _) = scene_with(3);
    scene.set_background("#000000");
    scene.resize(1080, 1920);
    scene.clear();
    assert!(scene.is_empty());
    assert_eq!(scene.background, "#000000");
    assert_eq!((scene.width, scene.height), (1080, 1920));
}

// =============================================================
// Scene: reorder
// =============================================================

#[test]
fn reorder_to_front_and_back() {
    let (mut scene, ids) = scene_with(3);
    assert!(scene.reorder(&ids[0], Reorder::ToFront));
    assert_eq!(order(&scene), vec![ids[1], ids[2], ids[0]]);
    assert!(scene.reorder(&ids[0], Reorder::ToBack));
    assert_eq!(order(&scene), vec![ids[0], ids[1], ids[2]]);
}

#[test]
fn reorder_forward_and_backward_swap_neighbors() {
    let (mut scene, ids) = scene_with(3);
    assert!(scene.reorder(&ids[1], Reorder::Forward));
    assert_eq!(order(&scene), vec![ids[0], ids[2], ids[1]]);
    assert!(scene.reorder(&ids[1], Reorder::Backward));
    assert_eq!(order(&scene), vec![ids[0], ids[1], ids[2]]);
}

#[test]
fn reorder_at_boundary_is_noop() {
    let (mut scene, ids) = scene_with(2);
    assert!(!scene.reorder(&ids[1], Reorder::ToFront));
    assert!(!scene.reorder(&ids[1], Reorder::Forward));
    assert!(!scene.reorder(&ids[0], Reorder::Backward));
    assert!(!scene.reorder(&Uuid::new_v4(), Reorder::ToBack));
}

// =============================================================
// Scene: patch
// =============================================================

#[test]
fn apply_patch_updates_only_present_fields() {
    let (mut scene, ids) = scene_with(1);
    let patch = ObjectPatch { left: Some(42.0), fill: Some("#00ff00".into()), ..ObjectPatch::default() };
    assert!(scene.apply_patch(&ids[0], &patch));
    let obj = scene.get(&ids[0]).unwrap();
    assert_eq!(obj.transform.left, 42.0);
    assert_eq!(obj.transform.top, 0.0);
    assert_eq!(obj.style.fill.as_deref(), Some("#00ff00"));
    assert_eq!(obj.style.stroke.as_deref(), Some("#ff0000"));
}

#[test]
fn apply_patch_normalizes_values() {
    let (mut scene, ids) = scene_with(1);
    let patch = ObjectPatch {
        angle: Some(-90.0),
        opacity: Some(3.0),
        stroke_width: Some(-2.0),
        ..ObjectPatch::default()
    };
    scene.apply_patch(&ids[0], &patch);
    let obj = scene.get(&ids[0]).unwrap();
    assert_eq!(obj.transform.angle, 270.0);
    assert_eq!(obj.style.opacity, 1.0);
    assert_eq!(obj.style.stroke_width, 0.0);
}

#[test]
fn apply_patch_unknown_id_is_false() {
    let (mut scene, _) = scene_with(1);
    assert!(!scene.apply_patch(&Uuid::new_v4(), &ObjectPatch::default()));
}

#[test]
fn patch_touches_transform() {
    assert!(!ObjectPatch { name: Some("x".into()), ..ObjectPatch::default() }.touches_transform());
    assert!(ObjectPatch { angle: Some(1.0), ..ObjectPatch::default() }.touches_transform());
}

#[test]
fn patch_skips_absent_fields_when_serialized() {
    let json = serde_json::to_string(&ObjectPatch { top: Some(1.0), ..ObjectPatch::default() }).unwrap();
    assert_eq!(json, r#"{"top":1.0}"#);
}

// =============================================================
// Layers & serialization
// =============================================================

#[test]
fn layers_are_front_most_first() {
    let (mut scene, ids) = scene_with(2);
    scene.get_mut(&ids[0]).unwrap().visible = false;
    let layers = scene.layers();
    assert_eq!(layers[0].id, ids[1]);
    assert_eq!(layers[1].id, ids[0]);
    assert!(!layers[1].visible);
    assert_eq!(layers[1].kind, ObjectKind::Rectangle);
}

#[test]
fn scene_json_roundtrip_preserves_order() {
    let (scene, _) = scene_with(3);
    let json = serde_json::to_string(&scene).unwrap();
    let back: Scene = serde_json::from_str(&json).unwrap();
    assert_eq!(back, scene);
}

#[test]
fn canvas_presets() {
    assert_eq!(CanvasPreset::Square.dimensions(), (1080, 1080));
    assert_eq!(CanvasPreset::Story.dimensions(), (1080, 1920));
    assert_eq!(CanvasPreset::Landscape.dimensions(), (1920, 1080));
    assert_eq!(CanvasPreset::Social.dimensions(), (1200, 630));
}
