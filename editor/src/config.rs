//! Editor defaults parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_HISTORY_LIMIT, DEFAULT_PASTE_OFFSET, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};

pub const DEFAULT_COLOR: &str = "#0078d4";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but its value could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Maximum number of history snapshots kept.
    pub history_limit: usize,
    /// Offset applied to both axes on paste.
    pub paste_offset: f64,
    /// Initial drawing color.
    pub color: String,
    /// Initial canvas background.
    pub background: String,
    /// Initial stroke/brush width.
    pub stroke_width: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            paste_offset: DEFAULT_PASTE_OFFSET,
            color: DEFAULT_COLOR.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl EditorConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PIXELCRAFT_HISTORY_LIMIT`: default 50, minimum 1
    /// - `PIXELCRAFT_PASTE_OFFSET`: default 20
    /// - `PIXELCRAFT_COLOR`: default `#0078d4`
    /// - `PIXELCRAFT_BACKGROUND`: default `#ffffff`
    /// - `PIXELCRAFT_STROKE_WIDTH`: default 5, clamped to 1..=100
    /// - `PIXELCRAFT_CANVAS_SIZE`: `WIDTHxHEIGHT`, default `800x600`
    ///
    /// # Errors
    ///
    /// Returns an error if `PIXELCRAFT_CANVAS_SIZE` is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup (the environment in production).
    ///
    /// # Errors
    ///
    /// Returns an error if `PIXELCRAFT_CANVAS_SIZE` is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let history_limit = parse_or(&lookup, "PIXELCRAFT_HISTORY_LIMIT", defaults.history_limit).max(1);
        let paste_offset = parse_or(&lookup, "PIXELCRAFT_PASTE_OFFSET", defaults.paste_offset);
        let stroke_width =
            parse_or(&lookup, "PIXELCRAFT_STROKE_WIDTH", defaults.stroke_width).clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
        let color = lookup("PIXELCRAFT_COLOR").unwrap_or(defaults.color);
        let background = lookup("PIXELCRAFT_BACKGROUND").unwrap_or(defaults.background);
        let (canvas_width, canvas_height) = match lookup("PIXELCRAFT_CANVAS_SIZE") {
            Some(raw) => parse_size(&raw)
                .ok_or(ConfigError::InvalidValue { var: "PIXELCRAFT_CANVAS_SIZE", value: raw.clone() })?,
            None => (defaults.canvas_width, defaults.canvas_height),
        };

        Ok(Self { history_limit, paste_offset, color, background, stroke_width, canvas_width, canvas_height })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}

/// Parse `"WIDTHxHEIGHT"` into non-zero dimensions.
#[must_use]
pub fn parse_size(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    let (Ok(w), Ok(h)) = (w.trim().parse::<u32>(), h.trim().parse::<u32>()) else {
        return None;
    };
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}
