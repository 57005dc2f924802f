//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the session's event dispatch.
//! `Tool` and `ToolSettings` capture the user's intent at the time of a
//! pointer event. `InputState` is the gesture being tracked between
//! pointer-down and pointer-up, carrying what is needed to update the preview
//! and to commit exactly once on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::doc::ObjectId;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Freehand stroke in the current color.
    Brush,
    /// Drag out a rectangle.
    Rectangle,
    /// Drag out a circle; the drag distance is the radius.
    Ellipse,
    /// Click to place a text object.
    Text,
    /// Freehand stroke in the background color.
    Eraser,
}

impl Tool {
    /// Whether this tool creates a shape by dragging.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Rectangle | Self::Ellipse)
    }

    /// Whether this tool hands pointer input to the renderer's drawing mode.
    #[must_use]
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Brush | Self::Eraser)
    }

    /// Single-key shortcut for the tool, as typed without modifiers.
    #[must_use]
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key {
            "v" => Some(Self::Select),
            "b" => Some(Self::Brush),
            "r" => Some(Self::Rectangle),
            "c" => Some(Self::Ellipse),
            "t" => Some(Self::Text),
            "e" => Some(Self::Eraser),
            _ => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    /// Meta / Command key is held.
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"z"`, `"ArrowLeft"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Lowercased key name, so `"Z"` with Shift matches `"z"`.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

/// Color and width handed to the renderer's freehand drawing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    pub color: String,
    pub width: f64,
}

/// Current paint settings used by creation tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub tool: Tool,
    /// CSS color for fills, strokes and brush.
    pub color: String,
    pub stroke_width: f64,
}

impl ToolSettings {
    /// Set the stroke width, clamped to `[MIN_STROKE_WIDTH, MAX_STROKE_WIDTH]`.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries gesture context needed to update the scene on
/// pointer-move and to finish the gesture on pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is drawing a new shape by dragging from an anchor point.
    DrawingShape {
        /// Rectangle or ellipse.
        tool: Tool,
        /// Scene-space point where the drag started.
        anchor: Point,
        /// Id of the provisional object being sized.
        preview_id: ObjectId,
    },
    /// The user is moving an existing object with the select tool.
    MovingObject {
        id: ObjectId,
        /// Scene-space pointer position at the previous event.
        last: Point,
        /// Whether any move happened; a click without movement commits nothing.
        moved: bool,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
