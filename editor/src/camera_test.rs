#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance_is_euclidean() {
    let a = Point::new(10.0, 10.0);
    let b = Point::new(13.0, 14.0);
    assert_eq!(a.distance(b), 5.0);
    assert_eq!(b.distance(a), 5.0);
}

#[test]
fn point_distance_to_self_is_zero() {
    let a = Point::new(-3.5, 7.25);
    assert_eq!(a.distance(a), 0.0);
}

// =============================================================
// Conversions
// =============================================================

#[test]
fn default_camera_is_identity() {
    let cam = Camera::default();
    let p = Point::new(42.0, -7.0);
    assert_eq!(cam.screen_to_world(p), p);
}

#[test]
fn screen_to_world_divides_by_zoom() {
    let cam = Camera { zoom: 2.0 };
    assert_eq!(cam.screen_to_world(Point::new(100.0, 50.0)), Point::new(50.0, 25.0));
}

#[test]
fn zoomed_out_screen_point_maps_further() {
    let cam = Camera { zoom: 0.5 };
    assert_eq!(cam.screen_to_world(Point::new(12.0, 34.0)), Point::new(24.0, 68.0));
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn zoom_by_multiplies() {
    let mut cam = Camera::default();
    cam.zoom_by(2.0);
    cam.zoom_by(1.5);
    assert_eq!(cam.zoom, 3.0);
}

#[test]
fn zoom_clamps_to_max() {
    let mut cam = Camera::default();
    for _ in 0..100 {
        cam.zoom_by(1.1);
    }
    assert_eq!(cam.zoom, MAX_ZOOM);
}

#[test]
fn zoom_clamps_to_min() {
    let mut cam = Camera::default();
    for _ in 0..100 {
        cam.zoom_by(0.5);
    }
    assert_eq!(cam.zoom, MIN_ZOOM);
}

#[test]
fn reset_restores_identity() {
    let mut cam = Camera { zoom: 4.0 };
    cam.reset();
    assert_eq!(cam.zoom, 1.0);
}

#[test]
fn percent_rounds() {
    let mut cam = Camera::default();
    assert_eq!(cam.percent(), 100);
    cam.zoom_by(1.1);
    assert_eq!(cam.percent(), 110);
}
