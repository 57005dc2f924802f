//! Image filter descriptors.
//!
//! Filters are data on an image object; the renderer does the pixel work.
//! An image holds at most one filter of each type, in the order they were
//! first applied.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use serde::{Deserialize, Serialize};

/// Strength used when a parameterized filter is applied without a value.
pub const DEFAULT_FILTER_VALUE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageFilter {
    Grayscale,
    Sepia,
    Invert,
    /// Blur radius as a fraction of the image, `0.0..=1.0`.
    Blur { blur: f64 },
    /// Brightness shift, `-1.0..=1.0`.
    Brightness { brightness: f64 },
    /// Contrast shift, `-1.0..=1.0`.
    Contrast { contrast: f64 },
}

/// Which filter slot a filter occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Grayscale,
    Sepia,
    Invert,
    Blur,
    Brightness,
    Contrast,
}

/// A filter request from the host: apply one filter or clear them all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "lowercase")]
pub enum FilterRequest {
    Apply {
        kind: FilterKind,
        #[serde(default)]
        value: Option<f64>,
    },
    Reset,
}

impl ImageFilter {
    /// Build a filter of `kind`, clamping `value` to the kind's range.
    #[must_use]
    pub fn new(kind: FilterKind, value: Option<f64>) -> Self {
        let v = value.unwrap_or(DEFAULT_FILTER_VALUE);
        match kind {
            FilterKind::Grayscale => Self::Grayscale,
            FilterKind::Sepia => Self::Sepia,
            FilterKind::Invert => Self::Invert,
            FilterKind::Blur => Self::Blur { blur: v.clamp(0.0, 1.0) },
            FilterKind::Brightness => Self::Brightness { brightness: v.clamp(-1.0, 1.0) },
            FilterKind::Contrast => Self::Contrast { contrast: v.clamp(-1.0, 1.0) },
        }
    }

    #[must_use]
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Grayscale => FilterKind::Grayscale,
            Self::Sepia => FilterKind::Sepia,
            Self::Invert => FilterKind::Invert,
            Self::Blur { .. } => FilterKind::Blur,
            Self::Brightness { .. } => FilterKind::Brightness,
            Self::Contrast { .. } => FilterKind::Contrast,
        }
    }
}

/// Apply `request` to a filter list in place.
///
/// A filter of an already present kind is moved to the end with its new value.
pub fn apply_request(filters: &mut Vec<ImageFilter>, request: FilterRequest) {
    match request {
        FilterRequest::Reset => filters.clear(),
        FilterRequest::Apply { kind, value } => {
            filters.retain(|f| f.kind() != kind);
            filters.push(ImageFilter::new(kind, value));
        }
    }
}
