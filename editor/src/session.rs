//! Editor session: the single owner of scene, history, selection and tools.
//!
//! DESIGN
//! ======
//! `EditorSession` is injected into whatever drives the editor (a UI shell,
//! the replay CLI, tests). Hosts feed it normalized input through
//! `on_pointer_down` / `on_pointer_move` / `on_pointer_up` / `on_key_down`
//! and call the named operations directly; every call returns the
//! [`Action`]s the host must react to (re-render, selection UI, drawing mode).
//!
//! Each logical user action produces at most one history commit and one
//! `RenderNeeded`. Drag frames only re-render; the commit lands on release.
//! While an undo/redo restoration is pending, or a pointer gesture is still
//! open, every mutating operation fails with `EditorError::Busy`. A drag
//! preview therefore never reaches a snapshot before its release decides
//! whether it is kept.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::camera::{Camera, Point};
use crate::config::EditorConfig;
use crate::consts::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT, ELEMENT_ORIGIN, ELEMENT_SIZE, FRAC_PI_5, HEART_SAMPLES,
    IMAGE_INSERT_WIDTH, MIN_SHAPE_SIZE, NUDGE_STEP, NUDGE_STEP_FAST, STAR_INNER_RATIO, ZOOM_IN_FACTOR,
    ZOOM_OUT_FACTOR,
};
use crate::doc::{
    CanvasPreset, LayerInfo, ObjectId, ObjectPatch, Reorder, Scene, SceneObject, Shape, Style, Transform,
};
use crate::error::EditorError;
use crate::filter::{self, FilterRequest};
use crate::history::{History, Snapshot};
use crate::hit::hit_test;
use crate::imageop::{ImageOp, ImageOpOutcome, ImageOpRequest};
use crate::input::{BrushSettings, Button, InputState, Key, Modifiers, Tool, ToolSettings};
use crate::selection::{Clipboard, Selection};

/// Background used when an enhanced image replaces the canvas.
const ENHANCE_BACKGROUND: &str = "#ffffff";

/// Actions returned from session operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The scene changed; draw it again.
    RenderNeeded,
    /// The active object changed.
    SelectionChanged(Option<ObjectId>),
    /// Objects were added, removed, renamed, reordered or toggled.
    LayersChanged,
    /// The authoritative history position moved. The flags drive the
    /// undo/redo toolbar buttons.
    HistoryChanged { index: usize, len: usize, can_undo: bool, can_redo: bool },
    /// The scene was replaced from a snapshot. The host reloads it, then
    /// calls [`EditorSession::finish_restore`].
    RestoreRequested,
    /// Freehand drawing mode turned on (with brush settings) or off.
    DrawingModeChanged(Option<BrushSettings>),
    /// A text object was placed; the host may open its text editor.
    EditTextRequested { id: ObjectId, text: String },
    /// View zoom changed.
    ZoomChanged(f64),
}

/// Ready-made shapes offered by the elements panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementPreset {
    Rectangle,
    Circle,
    Triangle,
    Star,
    Heart,
}

/// Editor state for one open document.
#[derive(Debug)]
pub struct EditorSession {
    scene: Scene,
    history: History,
    selection: Selection,
    clipboard: Clipboard,
    camera: Camera,
    settings: ToolSettings,
    input: InputState,
    paste_offset: f64,
}

impl EditorSession {
    /// Create a session with an empty canvas and commit it as the first
    /// history entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be serialized.
    pub fn new(config: &EditorConfig) -> Result<Self, EditorError> {
        let scene = Scene::new(config.canvas_width, config.canvas_height, &config.background);
        let mut history = History::new(config.history_limit);
        history.commit(Snapshot::capture(&scene)?)?;
        info!(
            width = config.canvas_width,
            height = config.canvas_height,
            history_limit = history.limit(),
            "session: created"
        );
        Ok(Self {
            scene,
            history,
            selection: Selection::default(),
            clipboard: Clipboard::default(),
            camera: Camera::default(),
            settings: ToolSettings {
                tool: Tool::Select,
                color: config.color.clone(),
                stroke_width: config.stroke_width,
            },
            input: InputState::Idle,
            paste_offset: config.paste_offset,
        })
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The currently selected object id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.selection.active()
    }

    #[must_use]
    pub fn selected_object(&self) -> Option<&SceneObject> {
        self.selection.active().and_then(|id| self.scene.get(&id))
    }

    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.scene.get(id)
    }

    #[must_use]
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.scene.layers()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.settings.tool
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    /// Brush settings for the renderer's freehand mode, when a freehand tool is active.
    ///
    /// The eraser paints with the canvas background color.
    #[must_use]
    pub fn drawing_mode(&self) -> Option<BrushSettings> {
        match self.settings.tool {
            Tool::Brush => Some(BrushSettings { color: self.settings.color.clone(), width: self.settings.stroke_width }),
            Tool::Eraser => {
                Some(BrushSettings { color: self.scene.background.clone(), width: self.settings.stroke_width })
            }
            _ => None,
        }
    }

    // --- History ---

    /// Reject edits while a restoration is pending or a gesture is open.
    fn ensure_writable(&self) -> Result<(), EditorError> {
        if self.history.is_restoring() {
            return Err(EditorError::Busy);
        }
        if !self.input.is_idle() {
            debug!("session: edit rejected during pointer gesture");
            return Err(EditorError::Busy);
        }
        Ok(())
    }

    fn history_changed(&self, index: usize) -> Action {
        Action::HistoryChanged {
            index,
            len: self.history.len(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    /// Snapshot the scene into the history.
    fn commit(&mut self) -> Result<Vec<Action>, EditorError> {
        let snapshot = Snapshot::capture(&self.scene)?;
        let index = self.history.commit(snapshot)?;
        Ok(vec![self.history_changed(index), Action::LayersChanged, Action::RenderNeeded])
    }

    /// Begin restoring the previous snapshot.
    ///
    /// The scene is replaced immediately; the history index moves once the
    /// host calls [`finish_restore`](Self::finish_restore).
    ///
    /// # Errors
    ///
    /// `NoHistory` at the oldest entry, `Busy` while a restoration or gesture is pending
    /// or a gesture is open.
    pub fn undo(&mut self) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let snapshot = self.history.undo()?;
        self.restore_from(&snapshot)
    }

    /// Begin restoring the next snapshot.
    ///
    /// # Errors
    ///
    /// `NoHistory` at the newest entry, `Busy` while a restoration or gesture is pending
    /// or a gesture is open.
    pub fn redo(&mut self) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let snapshot = self.history.redo()?;
        self.restore_from(&snapshot)
    }

    fn restore_from(&mut self, snapshot: &Snapshot) -> Result<Vec<Action>, EditorError> {
        let scene = match snapshot.restore() {
            Ok(scene) => scene,
            Err(e) => {
                self.history.abort_restore();
                warn!(error = %e, "session: snapshot failed to decode");
                return Err(e.into());
            }
        };
        self.scene = scene;
        let mut actions = Vec::new();
        if self.selection.retain(|id| self.scene.contains(id)) {
            actions.push(Action::SelectionChanged(None));
        }
        actions.extend([Action::RestoreRequested, Action::LayersChanged, Action::RenderNeeded]);
        Ok(actions)
    }

    /// Confirm that the host finished reloading a restored scene.
    pub fn finish_restore(&mut self) -> Vec<Action> {
        match self.history.finish_restore() {
            Some(index) => vec![self.history_changed(index)],
            None => Vec::new(),
        }
    }

    /// Give up on a pending restoration and put back the scene at the
    /// current history index.
    ///
    /// # Errors
    ///
    /// Returns an error if the current snapshot cannot be decoded.
    pub fn abort_restore(&mut self) -> Result<Vec<Action>, EditorError> {
        if !self.history.abort_restore() {
            return Ok(Vec::new());
        }
        if let Some(current) = self.history.current() {
            self.scene = current.restore()?;
        }
        Ok(vec![Action::LayersChanged, Action::RenderNeeded])
    }

    // --- Scene graph ---

    /// Append an object as the front-most one and commit.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn add_object(&mut self, obj: SceneObject) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let id = self.scene.add(obj);
        debug!(%id, "session: object added");
        self.commit()
    }

    /// Delete an object. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn remove_object(&mut self, id: &ObjectId) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        if self.scene.remove(id).is_none() {
            debug!(%id, "session: remove ignored, object not found");
            return Ok(Vec::new());
        }
        let mut actions = Vec::new();
        if self.selection.retain(|s| self.scene.contains(s)) {
            actions.push(Action::SelectionChanged(None));
        }
        actions.extend(self.commit()?);
        Ok(actions)
    }

    /// Move an object in paint order. Unknown ids and no-op moves are ignored.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn reorder(&mut self, id: &ObjectId, to: Reorder) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        if !self.scene.reorder(id, to) {
            return Ok(Vec::new());
        }
        self.commit()
    }

    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn set_background(&mut self, color: &str) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        self.scene.set_background(color);
        let mut actions = self.commit()?;
        if self.settings.tool == Tool::Eraser {
            actions.push(Action::DrawingModeChanged(self.drawing_mode()));
        }
        Ok(actions)
    }

    /// # Errors
    ///
    /// `InvalidGeometry` for a zero dimension, `Busy` while a restoration or gesture is pending.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        if width == 0 || height == 0 {
            return Err(EditorError::InvalidGeometry);
        }
        self.scene.resize(width, height);
        self.commit()
    }

    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn resize_to(&mut self, preset: CanvasPreset) -> Result<Vec<Action>, EditorError> {
        let (width, height) = preset.dimensions();
        self.resize(width, height)
    }

    /// Remove every object, keeping background and size.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn clear(&mut self) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        if self.scene.is_empty() {
            return Ok(Vec::new());
        }
        self.scene.clear();
        let mut actions = self.change_selection(None);
        actions.extend(self.commit()?);
        Ok(actions)
    }

    /// Swap an object for a new one built from `shape`, keeping its transform,
    /// style, name and flags. The replacement gets a fresh id and is selected.
    ///
    /// This is the only way external results (generative image operations)
    /// enter the scene.
    ///
    /// # Errors
    ///
    /// `NotFound` if `old_id` is gone, `Busy` while a restoration or gesture is pending.
    pub fn replace_object(&mut self, old_id: &ObjectId, shape: Shape) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let Some(old) = self.scene.get(old_id) else {
            return Err(EditorError::NotFound(*old_id));
        };
        let replacement = SceneObject { shape, ..old.duplicate() };
        let new_id = replacement.id;
        self.scene.replace(old_id, replacement);
        debug!(%old_id, %new_id, "session: object replaced");
        let mut actions = self.change_selection(Some(new_id));
        actions.extend(self.commit()?);
        Ok(actions)
    }

    // --- Object edits ---

    /// Apply a sparse patch to an object and commit.
    ///
    /// Locked objects keep their transform; the rest of the patch still applies.
    /// Font fields are only accepted for text objects.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `WrongKind` for font fields on a non-text
    /// object, `Busy` while a restoration or gesture is pending.
    pub fn update_object(&mut self, id: &ObjectId, patch: &ObjectPatch) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let Some(obj) = self.scene.get(id) else {
            return Err(EditorError::NotFound(*id));
        };
        if patch.touches_text() && !matches!(obj.shape, Shape::Text { .. }) {
            return Err(EditorError::WrongKind { expected: "a text object" });
        }
        let mut patch = patch.clone();
        if obj.locked && patch.touches_transform() {
            debug!(%id, "session: transform edit ignored on locked object");
            patch.left = None;
            patch.top = None;
            patch.scale_x = None;
            patch.scale_y = None;
            patch.angle = None;
        }
        if patch == ObjectPatch::default() {
            return Ok(Vec::new());
        }
        self.scene.apply_patch(id, &patch);
        self.commit()
    }

    /// Apply a sparse patch to the selected object. No-op without a selection.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn update_selected(&mut self, patch: &ObjectPatch) -> Result<Vec<Action>, EditorError> {
        match self.selection.active() {
            Some(id) => self.update_object(&id, patch),
            None => Ok(Vec::new()),
        }
    }

    /// Move the selected object by `(dx, dy)`. Locked objects stay put.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn nudge_selected(&mut self, dx: f64, dy: f64) -> Result<Vec<Action>, EditorError> {
        let Some(obj) = self.selected_object() else {
            return Ok(Vec::new());
        };
        let patch = ObjectPatch {
            left: Some(obj.transform.left + dx),
            top: Some(obj.transform.top + dy),
            ..ObjectPatch::default()
        };
        self.update_selected(&patch)
    }

    /// Replace the content of a text object.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `WrongKind` if the object is not text,
    /// `Busy` while a restoration or gesture is pending.
    pub fn set_text(&mut self, id: &ObjectId, text: &str) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let Some(obj) = self.scene.get_mut(id) else {
            return Err(EditorError::NotFound(*id));
        };
        let Shape::Text { text: ref mut current, .. } = obj.shape else {
            return Err(EditorError::WrongKind { expected: "a text object" });
        };
        if current.as_str() == text {
            return Ok(Vec::new());
        }
        *current = text.to_string();
        self.commit()
    }

    /// Change the font of a text object. The size is clamped to 10..=200.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `WrongKind` if the object is not text,
    /// `Busy` while a restoration or gesture is pending.
    pub fn set_font(
        &mut self,
        id: &ObjectId,
        font_size: Option<f64>,
        font_family: Option<&str>,
    ) -> Result<Vec<Action>, EditorError> {
        let patch = ObjectPatch { font_size, font_family: font_family.map(str::to_string), ..ObjectPatch::default() };
        self.update_object(id, &patch)
    }

    /// Apply or reset an image filter on the selected image.
    ///
    /// # Errors
    ///
    /// `WrongKind` if the selection is not an image, `Busy` while a
    /// restoration is pending.
    pub fn apply_filter(&mut self, request: FilterRequest) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let Some(id) = self.selection.active() else {
            return Ok(Vec::new());
        };
        let Some(obj) = self.scene.get_mut(&id) else {
            return Ok(Vec::new());
        };
        let Shape::Image { ref mut filters, .. } = obj.shape else {
            return Err(EditorError::WrongKind { expected: "an image" });
        };
        filter::apply_request(filters, request);
        debug!(%id, ?request, "session: filter applied");
        self.commit()
    }

    // --- Layers ---

    /// # Errors
    ///
    /// `NotFound` for an unknown id, `Busy` while a restoration or gesture is pending.
    pub fn toggle_visibility(&mut self, id: &ObjectId) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let Some(obj) = self.scene.get_mut(id) else {
            return Err(EditorError::NotFound(*id));
        };
        obj.visible = !obj.visible;
        self.commit()
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown id, `Busy` while a restoration or gesture is pending.
    pub fn toggle_lock(&mut self, id: &ObjectId) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let Some(obj) = self.scene.get_mut(id) else {
            return Err(EditorError::NotFound(*id));
        };
        obj.locked = !obj.locked;
        self.commit()
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown id, `Busy` while a restoration or gesture is pending.
    pub fn rename(&mut self, id: &ObjectId, name: &str) -> Result<Vec<Action>, EditorError> {
        let patch = ObjectPatch { name: Some(name.to_string()), ..ObjectPatch::default() };
        self.update_object(id, &patch)
    }

    // --- Selection & clipboard ---

    /// Select an object. An unknown id clears the selection.
    pub fn select(&mut self, id: &ObjectId) -> Vec<Action> {
        let target = if self.scene.contains(id) {
            Some(*id)
        } else {
            debug!(%id, "session: select of unknown object clears selection");
            None
        };
        with_render(self.change_selection(target))
    }

    pub fn deselect(&mut self) -> Vec<Action> {
        with_render(self.change_selection(None))
    }

    /// Point the selection at `target`, reporting a change without a render.
    fn change_selection(&mut self, target: Option<ObjectId>) -> Vec<Action> {
        if self.selection.active() == target {
            return Vec::new();
        }
        match target {
            Some(id) => self.selection.set(id),
            None => self.selection.clear(),
        }
        vec![Action::SelectionChanged(target)]
    }

    /// Copy the selected object into the clipboard. No-op without a selection
    /// or while a gesture is open, since the selection may be a shape preview.
    pub fn copy(&mut self) -> Vec<Action> {
        if !self.input.is_idle() {
            debug!("session: copy ignored during pointer gesture");
            return Vec::new();
        }
        if let Some(obj) = self.selection.active().and_then(|id| self.scene.get(&id)) {
            self.clipboard.store(obj);
            debug!(id = %obj.id, "session: copied");
        }
        Vec::new()
    }

    /// Add a shifted copy of the clipboard content, select it and commit.
    /// No-op on an empty clipboard.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn paste(&mut self) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let Some(obj) = self.clipboard.materialize(self.paste_offset) else {
            return Ok(Vec::new());
        };
        let id = self.scene.add(obj);
        debug!(%id, "session: pasted");
        let mut actions = self.change_selection(Some(id));
        actions.extend(self.commit()?);
        Ok(actions)
    }

    /// Copy then delete the selected object.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn cut(&mut self) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let mut actions = self.copy();
        actions.extend(self.delete_selected()?);
        Ok(actions)
    }

    /// Delete the selected object. No-op without a selection.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn delete_selected(&mut self) -> Result<Vec<Action>, EditorError> {
        match self.selection.active() {
            Some(id) => self.remove_object(&id),
            None => Ok(Vec::new()),
        }
    }

    // --- Creation ---

    /// Add a preset element at the standard drop point in the current color.
    ///
    /// # Errors
    ///
    /// `Busy` while a restoration or gesture is pending.
    pub fn add_element(&mut self, preset: ElementPreset) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let shape = match preset {
            ElementPreset::Rectangle => Shape::Rectangle { width: ELEMENT_SIZE, height: ELEMENT_SIZE },
            ElementPreset::Circle => Shape::Ellipse { rx: ELEMENT_SIZE / 2.0, ry: ELEMENT_SIZE / 2.0 },
            ElementPreset::Triangle => Shape::Path {
                points: vec![
                    Point::new(ELEMENT_SIZE / 2.0, 0.0),
                    Point::new(ELEMENT_SIZE, ELEMENT_SIZE),
                    Point::new(0.0, ELEMENT_SIZE),
                ],
                closed: true,
            },
            ElementPreset::Star => Shape::Path { points: star_points(ELEMENT_SIZE), closed: true },
            ElementPreset::Heart => Shape::Path { points: heart_points(ELEMENT_SIZE), closed: true },
        };
        let obj = SceneObject::new(
            shape,
            Transform::at(ELEMENT_ORIGIN, ELEMENT_ORIGIN),
            Style::filled(&self.settings.color),
        );
        let id = self.scene.add(obj);
        let mut actions = self.change_selection(Some(id));
        actions.extend(self.commit()?);
        Ok(actions)
    }

    /// Insert a decoded image, scaled to the standard width and centered on
    /// the canvas.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` for a non-positive size, `Busy` while a restoration
    /// is pending.
    pub fn insert_image(&mut self, data: Vec<u8>, width: f64, height: f64) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        if width <= 0.0 || height <= 0.0 {
            return Err(EditorError::InvalidGeometry);
        }
        let obj = self.fitted_image(data, width, height, IMAGE_INSERT_WIDTH);
        let id = self.scene.add(obj);
        let mut actions = self.change_selection(Some(id));
        actions.extend(self.commit()?);
        Ok(actions)
    }

    /// Image object scaled to `target_width` and centered on the canvas.
    fn fitted_image(&self, data: Vec<u8>, width: f64, height: f64, target_width: f64) -> SceneObject {
        let scale = target_width / width;
        let left = (f64::from(self.scene.width) - width * scale) / 2.0;
        let top = (f64::from(self.scene.height) - height * scale) / 2.0;
        let transform = Transform { left, top, scale_x: scale, scale_y: scale, angle: 0.0 };
        SceneObject::new(Shape::Image { data, width, height, filters: Vec::new() }, transform, Style::default())
    }

    /// Add a finished freehand stroke reported by the renderer's drawing mode.
    ///
    /// `points` are in scene space. The stroke takes the current brush color,
    /// or the background color while the eraser is active.
    ///
    /// # Errors
    ///
    /// `InvalidGeometry` for fewer than two points, `Busy` while a
    /// restoration is pending.
    pub fn commit_stroke(&mut self, points: &[Point]) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        if points.len() < 2 {
            return Err(EditorError::InvalidGeometry);
        }
        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let relative = points.iter().map(|p| Point::new(p.x - min_x, p.y - min_y)).collect();
        let brush = self
            .drawing_mode()
            .unwrap_or(BrushSettings { color: self.settings.color.clone(), width: self.settings.stroke_width });
        let obj = SceneObject::new(
            Shape::Path { points: relative, closed: false },
            Transform::at(min_x, min_y),
            Style::stroked(&brush.color, brush.width),
        );
        let id = self.scene.add(obj);
        debug!(%id, points = points.len(), "session: stroke committed");
        self.commit()
    }

    // --- Tools & settings ---

    /// Switch tools. An unfinished shape drag is discarded.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let was_freehand = self.settings.tool.is_freehand();
        self.settings.tool = tool;
        if tool.is_freehand() || was_freehand {
            actions.push(Action::DrawingModeChanged(self.drawing_mode()));
        }
        debug!(?tool, "session: tool changed");
        actions
    }

    pub fn set_color(&mut self, color: &str) -> Vec<Action> {
        self.settings.color = color.to_string();
        self.drawing_mode_refresh()
    }

    /// Set stroke width, clamped to the brush range.
    pub fn set_stroke_width(&mut self, width: f64) -> Vec<Action> {
        self.settings.set_stroke_width(width);
        self.drawing_mode_refresh()
    }

    fn drawing_mode_refresh(&self) -> Vec<Action> {
        match self.drawing_mode() {
            Some(brush) => vec![Action::DrawingModeChanged(Some(brush))],
            None => Vec::new(),
        }
    }

    // --- Zoom ---

    pub fn zoom_by(&mut self, factor: f64) -> Vec<Action> {
        self.camera.zoom_by(factor);
        debug!(percent = self.camera.percent(), "session: zoom changed");
        vec![Action::ZoomChanged(self.camera.zoom), Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_by(ZOOM_IN_FACTOR)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_by(ZOOM_OUT_FACTOR)
    }

    pub fn reset_zoom(&mut self) -> Vec<Action> {
        self.camera.reset();
        vec![Action::ZoomChanged(self.camera.zoom), Action::RenderNeeded]
    }

    // --- Image operations ---

    /// Build a background-removal request for the selected image.
    ///
    /// # Errors
    ///
    /// `WrongKind` when nothing or something other than an image is selected.
    pub fn background_removal_request(&self) -> Result<ImageOpRequest, EditorError> {
        let Some(obj) = self.selected_object() else {
            return Err(EditorError::WrongKind { expected: "a selected image" });
        };
        let Shape::Image { ref data, .. } = obj.shape else {
            return Err(EditorError::WrongKind { expected: "a selected image" });
        };
        Ok(ImageOpRequest { op: ImageOp::RemoveBackground, target: Some(obj.id), image: data.clone() })
    }

    /// Build an enhance request from the renderer's flattened canvas export.
    #[must_use]
    pub fn enhance_request(&self, canvas_image: Vec<u8>) -> ImageOpRequest {
        ImageOpRequest { op: ImageOp::Enhance, target: None, image: canvas_image }
    }

    /// Apply a successful image operation.
    ///
    /// `size` is the decoded result size; when absent the replaced image's
    /// size (background removal) or the canvas size (enhance) is assumed.
    ///
    /// # Errors
    ///
    /// `NotFound` if the target image was deleted meanwhile, `WrongKind` if it
    /// is no longer an image, `Busy` while a restoration or gesture is pending.
    pub fn apply_image_op(
        &mut self,
        outcome: ImageOpOutcome,
        size: Option<(f64, f64)>,
    ) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        match (outcome.op, outcome.target) {
            (ImageOp::RemoveBackground, Some(target)) => {
                let Some(old) = self.scene.get(&target) else {
                    return Err(EditorError::NotFound(target));
                };
                let Shape::Image { width, height, .. } = old.shape else {
                    return Err(EditorError::WrongKind { expected: "an image" });
                };
                let (width, height) = size.unwrap_or((width, height));
                let shape = Shape::Image { data: outcome.image, width, height, filters: Vec::new() };
                info!(%target, "session: background removal applied");
                self.replace_object(&target, shape)
            }
            (ImageOp::RemoveBackground, None) => Err(EditorError::WrongKind { expected: "a selected image" }),
            (ImageOp::Enhance, _) => {
                let canvas_w = f64::from(self.scene.width);
                let (width, height) = size.unwrap_or((canvas_w, f64::from(self.scene.height)));
                if width <= 0.0 || height <= 0.0 {
                    return Err(EditorError::InvalidGeometry);
                }
                self.scene.clear();
                self.scene.set_background(ENHANCE_BACKGROUND);
                let obj = self.fitted_image(outcome.image, width, height, canvas_w);
                self.scene.add(obj);
                info!("session: enhanced image applied");
                let mut actions = self.change_selection(None);
                actions.extend(self.commit()?);
                Ok(actions)
            }
        }
    }

    // --- Pointer input ---

    /// Handle pointer-down at a screen-space point.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_idle() {
            return Vec::new();
        }
        if self.history.is_restoring() {
            debug!("session: pointer ignored during restore");
            return Vec::new();
        }
        let pt = self.camera.screen_to_world(screen_pt);
        match self.settings.tool {
            Tool::Select => self.begin_select(pt),
            tool if tool.is_shape() => self.begin_shape(tool, pt),
            Tool::Text => quiet(self.place_text(pt)),
            _ => Vec::new(),
        }
    }

    /// Handle pointer-move at a screen-space point.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let pt = self.camera.screen_to_world(screen_pt);
        match self.input {
            InputState::Idle => Vec::new(),
            InputState::DrawingShape { tool, anchor, preview_id } => {
                if let Some(obj) = self.scene.get_mut(&preview_id) {
                    drag_geometry(obj, tool, anchor, pt);
                }
                vec![Action::RenderNeeded]
            }
            InputState::MovingObject { id, last, .. } => {
                if pt == last {
                    return Vec::new();
                }
                if let Some(obj) = self.scene.get_mut(&id) {
                    obj.transform.left += pt.x - last.x;
                    obj.transform.top += pt.y - last.y;
                }
                self.input = InputState::MovingObject { id, last: pt, moved: true };
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Handle pointer-up at a screen-space point. Finishing a gesture commits
    /// at most once.
    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let pt = self.camera.screen_to_world(screen_pt);
        if matches!(self.input, InputState::MovingObject { .. }) {
            self.on_pointer_move(screen_pt, modifiers);
        }
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DrawingShape { tool, anchor, preview_id } => quiet(self.finish_shape(tool, anchor, preview_id, pt)),
            InputState::MovingObject { moved: false, .. } => Vec::new(),
            InputState::MovingObject { id, moved: true, .. } => self.finish_move(id),
        }
    }

    fn begin_select(&mut self, pt: Point) -> Vec<Action> {
        let Some(hit) = hit_test(pt, &self.scene) else {
            return self.deselect();
        };
        let (id, locked) = (hit.id, hit.locked);
        if !locked {
            self.input = InputState::MovingObject { id, last: pt, moved: false };
        }
        with_render(self.change_selection(Some(id)))
    }

    fn begin_shape(&mut self, tool: Tool, pt: Point) -> Vec<Action> {
        let shape = match tool {
            Tool::Ellipse => Shape::Ellipse { rx: 0.0, ry: 0.0 },
            _ => Shape::Rectangle { width: 0.0, height: 0.0 },
        };
        let obj = SceneObject::new(shape, Transform::at(pt.x, pt.y), Style::filled(&self.settings.color));
        let preview_id = self.scene.add(obj);
        self.input = InputState::DrawingShape { tool, anchor: pt, preview_id };
        let mut actions = self.change_selection(Some(preview_id));
        actions.extend([Action::LayersChanged, Action::RenderNeeded]);
        actions
    }

    fn finish_shape(
        &mut self,
        tool: Tool,
        anchor: Point,
        preview_id: ObjectId,
        pt: Point,
    ) -> Result<Vec<Action>, EditorError> {
        let Some(obj) = self.scene.get_mut(&preview_id) else {
            return Err(EditorError::NotFound(preview_id));
        };
        drag_geometry(obj, tool, anchor, pt);
        if validate_shape(&obj.shape).is_err() {
            self.scene.remove(&preview_id);
            debug!(%preview_id, "session: degenerate shape discarded");
            let mut actions = self.change_selection(None);
            actions.extend([Action::LayersChanged, Action::RenderNeeded]);
            return Ok(actions);
        }
        self.commit()
    }

    fn place_text(&mut self, pt: Point) -> Result<Vec<Action>, EditorError> {
        self.ensure_writable()?;
        let shape = Shape::Text {
            text: DEFAULT_TEXT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        };
        let style = Style { fill: Some(self.settings.color.clone()), ..Style::default() };
        let id = self.scene.add(SceneObject::new(shape, Transform::at(pt.x, pt.y), style));
        let mut actions = self.change_selection(Some(id));
        actions.extend(self.commit()?);
        actions.push(Action::EditTextRequested { id, text: DEFAULT_TEXT.to_string() });
        Ok(actions)
    }

    /// Abandon the current gesture. A shape preview is removed; a partial move
    /// is kept in the scene and committed.
    fn cancel_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::MovingObject { moved: false, .. } => Vec::new(),
            InputState::DrawingShape { preview_id, .. } => {
                self.scene.remove(&preview_id);
                let mut actions = self.change_selection(None);
                actions.extend([Action::LayersChanged, Action::RenderNeeded]);
                actions
            }
            InputState::MovingObject { id, moved: true, .. } => self.finish_move(id),
        }
    }

    /// Commit a completed move, unless the moved object is gone.
    fn finish_move(&mut self, id: ObjectId) -> Vec<Action> {
        if !self.scene.contains(&id) {
            debug!(%id, "session: moved object vanished, nothing to commit");
            return Vec::new();
        }
        debug!(%id, "session: move finished");
        quiet(self.commit())
    }

    // --- Keyboard input ---

    /// Handle a key press.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let name = key.normalized();
        if modifiers.command() {
            return match name.as_str() {
                "z" if modifiers.shift => quiet(self.redo()),
                "z" => quiet(self.undo()),
                "y" => quiet(self.redo()),
                "c" => self.copy(),
                "v" => quiet(self.paste()),
                "x" => quiet(self.cut()),
                "=" | "+" => self.zoom_in(),
                "-" => self.zoom_out(),
                "0" => self.reset_zoom(),
                _ => Vec::new(),
            };
        }
        if let Some(tool) = Tool::from_shortcut(&name) {
            return self.set_tool(tool);
        }
        let step = if modifiers.shift { NUDGE_STEP_FAST } else { NUDGE_STEP };
        match name.as_str() {
            "[" => self.set_stroke_width(self.settings.stroke_width - 1.0),
            "]" => self.set_stroke_width(self.settings.stroke_width + 1.0),
            "delete" | "backspace" => quiet(self.delete_selected()),
            "arrowleft" => quiet(self.nudge_selected(-step, 0.0)),
            "arrowright" => quiet(self.nudge_selected(step, 0.0)),
            "arrowup" => quiet(self.nudge_selected(0.0, -step)),
            "arrowdown" => quiet(self.nudge_selected(0.0, step)),
            _ => Vec::new(),
        }
    }
}

/// Append a render request to a non-empty selection change.
fn with_render(mut actions: Vec<Action>) -> Vec<Action> {
    if !actions.is_empty() {
        actions.push(Action::RenderNeeded);
    }
    actions
}

/// Collapse an operation result into its actions, logging the error.
fn quiet(result: Result<Vec<Action>, EditorError>) -> Vec<Action> {
    match result {
        Ok(actions) => actions,
        Err(e) if e.is_silent() => {
            debug!(error = %e, "session: no-op");
            Vec::new()
        }
        Err(e) => {
            warn!(error = %e, "session: operation rejected");
            Vec::new()
        }
    }
}

/// Resize a preview object from the drag anchor to `pt`.
///
/// Rectangles span the min/max box of the two points. Ellipses keep their
/// top-left at the anchor and take the anchor distance as radius.
fn drag_geometry(obj: &mut SceneObject, tool: Tool, anchor: Point, pt: Point) {
    match (tool, &mut obj.shape) {
        (Tool::Rectangle, Shape::Rectangle { width, height }) => {
            *width = (pt.x - anchor.x).abs();
            *height = (pt.y - anchor.y).abs();
            obj.transform.left = anchor.x.min(pt.x);
            obj.transform.top = anchor.y.min(pt.y);
        }
        (Tool::Ellipse, Shape::Ellipse { rx, ry }) => {
            let radius = anchor.distance(pt);
            *rx = radius;
            *ry = radius;
        }
        _ => {}
    }
}

/// Reject shapes released without a usable extent.
fn validate_shape(shape: &Shape) -> Result<(), EditorError> {
    let ok = match shape {
        Shape::Rectangle { width, height } => *width >= MIN_SHAPE_SIZE && *height >= MIN_SHAPE_SIZE,
        Shape::Ellipse { rx, ry } => *rx >= MIN_SHAPE_SIZE && *ry >= MIN_SHAPE_SIZE,
        _ => true,
    };
    if ok { Ok(()) } else { Err(EditorError::InvalidGeometry) }
}

/// Vertices of a five-point star inscribed in a `size` box, starting at the top.
fn star_points(size: f64) -> Vec<Point> {
    let outer = size / 2.0;
    let inner = outer * STAR_INNER_RATIO;
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let theta = f64::from(i) * FRAC_PI_5 - std::f64::consts::FRAC_PI_2;
            Point::new(outer + r * theta.cos(), outer + r * theta.sin())
        })
        .collect()
}

/// Closed heart outline inscribed in a `size` box, lobes up.
///
/// Samples the curve `x = 16 sin³t`, `y = 13 cos t - 5 cos 2t - 2 cos 3t - cos 4t`,
/// whose extent is 32 by roughly 29 units, and flips y for screen space.
fn heart_points(size: f64) -> Vec<Point> {
    let raw: Vec<(f64, f64)> = (0..HEART_SAMPLES)
        .map(|i| {
            let t = std::f64::consts::TAU * f64::from(i) / f64::from(HEART_SAMPLES);
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            (x, -y)
        })
        .collect();
    let min_y = raw.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = raw.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let scale_x = size / 32.0;
    let scale_y = size / (max_y - min_y);
    raw.into_iter()
        .map(|(x, y)| Point::new((x + 16.0) * scale_x, (y - min_y) * scale_y))
        .collect()
}
