#![allow(clippy::float_cmp)]

use super::*;

fn apply(kind: FilterKind, value: Option<f64>) -> FilterRequest {
    FilterRequest::Apply { kind, value }
}

// =============================================================
// ImageFilter::new
// =============================================================

#[test]
fn parameterized_filters_default_value() {
    assert_eq!(ImageFilter::new(FilterKind::Blur, None), ImageFilter::Blur { blur: DEFAULT_FILTER_VALUE });
    assert_eq!(
        ImageFilter::new(FilterKind::Brightness, None),
        ImageFilter::Brightness { brightness: DEFAULT_FILTER_VALUE }
    );
}

#[test]
fn values_are_clamped_per_kind() {
    assert_eq!(ImageFilter::new(FilterKind::Blur, Some(-0.5)), ImageFilter::Blur { blur: 0.0 });
    assert_eq!(ImageFilter::new(FilterKind::Contrast, Some(-3.0)), ImageFilter::Contrast { contrast: -1.0 });
    assert_eq!(ImageFilter::new(FilterKind::Brightness, Some(2.0)), ImageFilter::Brightness { brightness: 1.0 });
}

#[test]
fn plain_filters_ignore_value() {
    assert_eq!(ImageFilter::new(FilterKind::Sepia, Some(0.7)), ImageFilter::Sepia);
    assert_eq!(ImageFilter::new(FilterKind::Invert, Some(0.7)).kind(), FilterKind::Invert);
}

// =============================================================
// apply_request
// =============================================================

#[test]
fn same_kind_replaces_and_moves_to_end() {
    let mut filters = Vec::new();
    apply_request(&mut filters, apply(FilterKind::Blur, Some(0.2)));
    apply_request(&mut filters, apply(FilterKind::Grayscale, None));
    apply_request(&mut filters, apply(FilterKind::Blur, Some(0.4)));
    assert_eq!(filters, vec![ImageFilter::Grayscale, ImageFilter::Blur { blur: 0.4 }]);
}

#[test]
fn reset_clears_all() {
    let mut filters = vec![ImageFilter::Sepia, ImageFilter::Invert];
    apply_request(&mut filters, FilterRequest::Reset);
    assert!(filters.is_empty());
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn filter_json_shape() {
    let json = serde_json::to_value(ImageFilter::Blur { blur: 0.5 }).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "blur", "blur": 0.5 }));
}

#[test]
fn request_parses_without_value() {
    let req: FilterRequest = serde_json::from_str(r#"{"filter":"apply","kind":"sepia"}"#).unwrap();
    assert_eq!(req, apply(FilterKind::Sepia, None));
    let reset: FilterRequest = serde_json::from_str(r#"{"filter":"reset"}"#).unwrap();
    assert_eq!(reset, FilterRequest::Reset);
}
