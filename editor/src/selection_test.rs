#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Shape, Style, Transform};

fn rect() -> SceneObject {
    SceneObject::new(Shape::Rectangle { width: 10.0, height: 10.0 }, Transform::at(5.0, 5.0), Style::default())
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selection_set_and_clear() {
    let obj = rect();
    let mut sel = Selection::default();
    assert_eq!(sel.active(), None);
    sel.set(obj.id);
    assert_eq!(sel.active(), Some(obj.id));
    sel.clear();
    assert_eq!(sel.active(), None);
}

#[test]
fn retain_clears_stale_selection() {
    let obj = rect();
    let mut sel = Selection::default();
    sel.set(obj.id);
    assert!(!sel.retain(|id| *id == obj.id));
    assert!(sel.retain(|_| false));
    assert_eq!(sel.active(), None);
    assert!(!sel.retain(|_| false));
}

// =============================================================
// Clipboard
// =============================================================

#[test]
fn empty_clipboard_materializes_nothing() {
    let mut clip = Clipboard::default();
    assert!(clip.materialize(20.0).is_none());
}

#[test]
fn store_keeps_independent_copy() {
    let mut obj = rect();
    let mut clip = Clipboard::default();
    clip.store(&obj);
    obj.transform.left = 999.0;
    let pasted = clip.materialize(0.0).unwrap();
    assert_eq!(pasted.transform.left, 5.0);
    assert_ne!(pasted.id, obj.id);
}

#[test]
fn materialize_offsets_and_assigns_fresh_id() {
    let obj = rect();
    let mut clip = Clipboard::default();
    clip.store(&obj);
    let pasted = clip.materialize(20.0).unwrap();
    assert_ne!(pasted.id, obj.id);
    assert_eq!(pasted.transform.left, 25.0);
    assert_eq!(pasted.transform.top, 25.0);
    assert_eq!(pasted.shape, obj.shape);
}

#[test]
fn repeated_pastes_cascade() {
    let mut clip = Clipboard::default();
    clip.store(&rect());
    let first = clip.materialize(20.0).unwrap();
    let second = clip.materialize(20.0).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(second.transform.left, 45.0);
    assert_ne!(clip.materialize(0.0).unwrap().id, second.id);
}

#[test]
fn store_replaces_previous_content() {
    let mut clip = Clipboard::default();
    clip.store(&rect());
    let other = SceneObject::new(Shape::Ellipse { rx: 3.0, ry: 3.0 }, Transform::at(0.0, 0.0), Style::default());
    clip.store(&other);
    assert_eq!(clip.materialize(0.0).unwrap().shape, other.shape);
}
