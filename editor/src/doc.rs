//! Document model: scene objects, the ordered scene, and sparse edits.
//!
//! This module defines what is on the canvas (`SceneObject`, `Shape`), the
//! runtime container that owns every live object in paint order (`Scene`),
//! a sparse-update type for property edits (`ObjectPatch`), and the
//! read-only layer projection shown by the host's layer panel (`LayerInfo`).
//!
//! Paint order is sequence order: index 0 is drawn first (back-most) and the
//! last object is front-most. There is no separate z-index to drift out of
//! sync with the sequence.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{DEFAULT_FONT_FAMILY, GLYPH_WIDTH_RATIO, LINE_HEIGHT_RATIO, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::filter::ImageFilter;

/// Unique identifier for a scene object.
pub type ObjectId = Uuid;

/// The kind of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Rectangle,
    Ellipse,
    Path,
    Text,
    Image,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rectangle => "rect",
            Self::Ellipse => "ellipse",
            Self::Path => "path",
            Self::Text => "text",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// Kind-specific geometry and content.
///
/// All extents are unscaled; the object's [`Transform`] applies scale and
/// rotation on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned rectangle anchored at its top-left corner.
    Rectangle { width: f64, height: f64 },
    /// Ellipse inscribed in a `2rx` by `2ry` box anchored at its top-left corner.
    Ellipse { rx: f64, ry: f64 },
    /// Polyline or polygon. Points are relative to the object's position.
    Path { points: Vec<Point>, closed: bool },
    /// Single- or multi-line text.
    Text {
        text: String,
        font_size: f64,
        #[serde(default = "default_font_family")]
        font_family: String,
    },
    /// Raster image. `data` is the encoded payload as supplied by the host.
    Image {
        data: Vec<u8>,
        width: f64,
        height: f64,
        #[serde(default)]
        filters: Vec<ImageFilter>,
    },
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Rectangle { .. } => ObjectKind::Rectangle,
            Self::Ellipse { .. } => ObjectKind::Ellipse,
            Self::Path { .. } => ObjectKind::Path,
            Self::Text { .. } => ObjectKind::Text,
            Self::Image { .. } => ObjectKind::Image,
        }
    }

    /// Unscaled width and height of the shape's bounding box.
    ///
    /// Text extent is estimated from glyph count and font size; the renderer
    /// owns real text metrics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn extent(&self) -> (f64, f64) {
        match self {
            Self::Rectangle { width, height } | Self::Image { width, height, .. } => (*width, *height),
            Self::Ellipse { rx, ry } => (rx * 2.0, ry * 2.0),
            Self::Path { points, .. } => {
                let max_x = points.iter().map(|p| p.x).fold(0.0_f64, f64::max);
                let max_y = points.iter().map(|p| p.y).fold(0.0_f64, f64::max);
                (max_x, max_y)
            }
            Self::Text { text, font_size, .. } => {
                let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                let lines = text.lines().count().max(1);
                (
                    longest as f64 * font_size * GLYPH_WIDTH_RATIO,
                    lines as f64 * font_size * LINE_HEIGHT_RATIO,
                )
            }
        }
    }
}

/// Position, scale and rotation of an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Left edge of the unrotated bounding box in scene coordinates.
    pub left: f64,
    /// Top edge of the unrotated bounding box in scene coordinates.
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Clockwise rotation in degrees around the bounding-box center.
    pub angle: f64,
}

impl Transform {
    #[must_use]
    pub fn at(left: f64, top: f64) -> Self {
        Self { left, top, ..Self::default() }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self { left: 0.0, top: 0.0, scale_x: 1.0, scale_y: 1.0, angle: 0.0 }
    }
}

/// Paint attributes. Colors are CSS color strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    /// `0.0..=1.0`.
    pub opacity: f64,
}

impl Style {
    /// A filled shape with no visible stroke.
    #[must_use]
    pub fn filled(color: &str) -> Self {
        Self { fill: Some(color.to_string()), stroke: Some(color.to_string()), stroke_width: 0.0, opacity: 1.0 }
    }

    /// An unfilled stroke, as produced by the brush.
    #[must_use]
    pub fn stroked(color: &str, width: f64) -> Self {
        Self { fill: None, stroke: Some(color.to_string()), stroke_width: width, opacity: 1.0 }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 0.0, opacity: 1.0 }
    }
}

/// Axis-aligned box in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A drawable object as stored in the scene and in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    /// Display name shown in the layer list. Filled in by [`Scene::add`] when empty.
    #[serde(default)]
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    pub style: Style,
    pub visible: bool,
    /// Locked objects can be selected but not moved, resized or nudged.
    pub locked: bool,
}

impl SceneObject {
    /// Create a visible, unlocked object with a fresh id.
    #[must_use]
    pub fn new(shape: Shape, transform: Transform, style: Style) -> Self {
        Self { id: Uuid::new_v4(), name: String::new(), shape, transform, style, visible: true, locked: false }
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    /// Scaled, unrotated bounding box.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let (w, h) = self.shape.extent();
        Bounds {
            x: self.transform.left,
            y: self.transform.top,
            width: w * self.transform.scale_x.abs(),
            height: h * self.transform.scale_y.abs(),
        }
    }

    /// Deep copy with a fresh id. Every other attribute is preserved.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self { id: Uuid::new_v4(), ..self.clone() }
    }
}

/// Sparse update for a scene object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Text objects only. Clamped to the accepted font size range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Text objects only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl ObjectPatch {
    /// Whether the patch moves, scales or rotates the object.
    #[must_use]
    pub fn touches_transform(&self) -> bool {
        self.left.is_some()
            || self.top.is_some()
            || self.scale_x.is_some()
            || self.scale_y.is_some()
            || self.angle.is_some()
    }

    /// Whether the patch carries text-only fields.
    #[must_use]
    pub fn touches_text(&self) -> bool {
        self.font_size.is_some() || self.font_family.is_some()
    }
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

/// Where [`Scene::reorder`] moves an object in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reorder {
    ToFront,
    ToBack,
    Forward,
    Backward,
}

/// Standard canvas sizes offered by the resize menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasPreset {
    /// 1080 x 1080 square post.
    Square,
    /// 1080 x 1920 portrait story.
    Story,
    /// 1920 x 1080 landscape.
    Landscape,
    /// 1200 x 630 link preview.
    Social,
}

impl CanvasPreset {
    #[must_use]
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Square => (1080, 1080),
            Self::Story => (1080, 1920),
            Self::Landscape => (1920, 1080),
            Self::Social => (1200, 630),
        }
    }
}

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub visible: bool,
    pub locked: bool,
}

/// The full drawable state: objects in paint order plus canvas attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<SceneObject>,
    /// Canvas background as a CSS color string.
    pub background: String,
    pub width: u32,
    pub height: u32,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new(width: u32, height: u32, background: &str) -> Self {
        Self { objects: Vec::new(), background: background.to_string(), width, height }
    }

    /// Append an object as the front-most one and return its id.
    ///
    /// An object whose id is already present replaces the old entry, which
    /// keeps ids unique. An empty name becomes `"<kind> <n>"`.
    pub fn add(&mut self, mut obj: SceneObject) -> ObjectId {
        self.objects.retain(|o| o.id != obj.id);
        if obj.name.is_empty() {
            obj.name = format!("{} {}", obj.kind(), self.objects.len() + 1);
        }
        let id = obj.id;
        self.objects.push(obj);
        id
    }

    /// Remove an object by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let idx = self.position(id)?;
        Some(self.objects.remove(idx))
    }

    /// Swap the object with `id` for `obj` at the same paint position.
    ///
    /// Returns false if `id` is not in the scene.
    pub fn replace(&mut self, id: &ObjectId, obj: SceneObject) -> bool {
        if !self.contains(id) {
            return false;
        }
        if obj.id != *id {
            self.objects.retain(|o| o.id != obj.id);
        }
        let Some(idx) = self.position(id) else {
            return false;
        };
        self.objects[idx] = obj;
        true
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == *id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.position(id).is_some()
    }

    /// Paint-order index of an object (0 = back-most).
    #[must_use]
    pub fn position(&self, id: &ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == *id)
    }

    /// Move an object within the paint order. Returns false if `id` is absent
    /// or the object is already where it would move to.
    pub fn reorder(&mut self, id: &ObjectId, to: Reorder) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let last = self.objects.len() - 1;
        let target = match to {
            Reorder::ToFront => last,
            Reorder::ToBack => 0,
            Reorder::Forward => (idx + 1).min(last),
            Reorder::Backward => idx.saturating_sub(1),
        };
        if target == idx {
            return false;
        }
        let obj = self.objects.remove(idx);
        self.objects.insert(target, obj);
        true
    }

    pub fn set_background(&mut self, color: &str) {
        self.background = color.to_string();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Apply a sparse patch to an existing object. Returns false if the object doesn't exist.
    pub fn apply_patch(&mut self, id: &ObjectId, patch: &ObjectPatch) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        let t = &mut obj.transform;
        if let Some(v) = patch.left {
            t.left = v;
        }
        if let Some(v) = patch.top {
            t.top = v;
        }
        if let Some(v) = patch.scale_x {
            t.scale_x = v;
        }
        if let Some(v) = patch.scale_y {
            t.scale_y = v;
        }
        if let Some(v) = patch.angle {
            t.angle = v.rem_euclid(360.0);
        }
        let s = &mut obj.style;
        if let Some(ref v) = patch.fill {
            s.fill = Some(v.clone());
        }
        if let Some(ref v) = patch.stroke {
            s.stroke = Some(v.clone());
        }
        if let Some(v) = patch.stroke_width {
            s.stroke_width = v.max(0.0);
        }
        if let Some(v) = patch.opacity {
            s.opacity = v.clamp(0.0, 1.0);
        }
        if let Some(ref v) = patch.name {
            obj.name = v.clone();
        }
        if let Shape::Text { ref mut font_size, ref mut font_family, .. } = obj.shape {
            if let Some(v) = patch.font_size {
                *font_size = v.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            }
            if let Some(ref v) = patch.font_family {
                font_family.clone_from(v);
            }
        }
        true
    }

    /// Remove every object, keeping background and size.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Objects in paint order, back-most first.
    pub fn objects(&self) -> impl DoubleEndedIterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// Layer panel rows, front-most first.
    #[must_use]
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.objects
            .iter()
            .rev()
            .map(|o| LayerInfo { id: o.id, name: o.name.clone(), kind: o.kind(), visible: o.visible, locked: o.locked })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
