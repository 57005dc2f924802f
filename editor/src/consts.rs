//! Shared numeric constants for the editor crate.

// ── Math ────────────────────────────────────────────────────────

/// π / 5 (36°), the angular step for a 10-vertex star polygon.
pub const FRAC_PI_5: f64 = std::f64::consts::PI / 5.0;

/// Inner-to-outer radius ratio for the five-point star preset.
pub const STAR_INNER_RATIO: f64 = 0.5;

/// Samples taken along the heart outline.
pub const HEART_SAMPLES: u32 = 32;

// ── History ─────────────────────────────────────────────────────

/// Default maximum number of snapshots kept by the history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width/height (or radius) a drawn shape may be released at.
pub const MIN_SHAPE_SIZE: f64 = 1.0;

/// Offset applied to both axes when pasting from the clipboard.
pub const DEFAULT_PASTE_OFFSET: f64 = 20.0;

/// Nudge distance for arrow keys, and with Shift held.
pub const NUDGE_STEP: f64 = 1.0;
pub const NUDGE_STEP_FAST: f64 = 10.0;

/// Width inserted images are scaled to.
pub const IMAGE_INSERT_WIDTH: f64 = 400.0;

/// Where element presets are dropped, and their bounding box size.
pub const ELEMENT_ORIGIN: f64 = 100.0;
pub const ELEMENT_SIZE: f64 = 100.0;

// ── Text ────────────────────────────────────────────────────────

pub const DEFAULT_FONT_SIZE: f64 = 20.0;
pub const DEFAULT_FONT_FAMILY: &str = "Times New Roman";
pub const DEFAULT_TEXT: &str = "Double click to edit";

/// Font size range accepted by text edits.
pub const MIN_FONT_SIZE: f64 = 10.0;
pub const MAX_FONT_SIZE: f64 = 200.0;

/// Approximate advance width of one glyph, as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.16;

// ── Zoom ────────────────────────────────────────────────────────

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 20.0;
pub const ZOOM_IN_FACTOR: f64 = 1.1;
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

// ── Brush ───────────────────────────────────────────────────────

pub const MIN_STROKE_WIDTH: f64 = 1.0;
pub const MAX_STROKE_WIDTH: f64 = 100.0;
