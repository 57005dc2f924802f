//! Replay scripts: a JSON list of editor steps applied to a fresh session.
//!
//! Object ids are random per run, so steps that target an object address it
//! by its row in the layer list (0 = front-most) or act on the selection.
//! The runner plays the renderer's part in the restore handshake: whenever a
//! step asks for a scene reload it immediately confirms with
//! `finish_restore`.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use editor::camera::Point;
use editor::doc::{CanvasPreset, ObjectPatch, Reorder, Shape, Style, Transform};
use editor::filter::FilterRequest;
use editor::imageop::ImageOpOutcome;
use editor::input::{Button, Key, Modifiers, Tool};
use editor::session::ElementPreset;
use editor::{Action, EditorError, EditorSession, SceneObject};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: EditorError,
    },

    #[error("step {index}: no layer at row {layer}")]
    NoLayer { index: usize, layer: usize },
}

/// One scripted editor action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: Tool },
    Color { color: String },
    StrokeWidth { width: f64 },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Press at `from`, move to `to`, release, with the current tool.
    Drag { from: Point, to: Point },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Undo,
    Redo,
    Element { preset: ElementPreset },
    Image {
        width: f64,
        height: f64,
        #[serde(default)]
        data: Vec<u8>,
    },
    Stroke { points: Vec<Point> },
    /// Add an arbitrary shape with its top-left corner at `(x, y)`.
    Object {
        shape: Shape,
        x: f64,
        y: f64,
        #[serde(default)]
        style: Style,
    },
    /// Select the object at a layer-list row.
    Select { layer: usize },
    Deselect,
    Update { patch: ObjectPatch },
    Nudge { dx: f64, dy: f64 },
    Text { text: String },
    /// Change the selected text object's font.
    Font {
        #[serde(default)]
        size: Option<f64>,
        #[serde(default)]
        family: Option<String>,
    },
    Filter { request: FilterRequest },
    Reorder { to: Reorder },
    ToggleVisibility { layer: usize },
    ToggleLock { layer: usize },
    Rename { layer: usize, name: String },
    Copy,
    Paste,
    Cut,
    Delete,
    Background { color: String },
    Resize { width: u32, height: u32 },
    ResizePreset { preset: CanvasPreset },
    Clear,
    Zoom { factor: f64 },
    ResetZoom,
    /// Apply `result` as the background-removal output for the selected image.
    RemoveBackground {
        #[serde(default)]
        result: Vec<u8>,
    },
    /// Apply `result`, sized `width` x `height`, as the enhanced canvas.
    Enhance {
        #[serde(default)]
        result: Vec<u8>,
        width: f64,
        height: f64,
    },
}

/// Counters collected while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    pub commits: usize,
    pub restores: usize,
    /// Steps that were silent no-ops (undo at the start, stale ids, degenerate shapes).
    pub skipped: usize,
}

/// Parse a script from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of steps.
pub fn parse(json: &str) -> Result<Vec<Step>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Apply `steps` to `session` in order.
///
/// Silent editor errors skip the step; any other error stops the replay.
///
/// # Errors
///
/// Returns the first non-silent editor error, or `NoLayer` for a layer row
/// that does not exist.
pub fn replay(session: &mut EditorSession, steps: &[Step]) -> Result<ReplayReport, ScriptError> {
    let mut report = ReplayReport::default();
    for (index, step) in steps.iter().enumerate() {
        report.steps += 1;
        let actions = match apply(session, step, index)? {
            Ok(actions) => actions,
            Err(e) if e.is_silent() => {
                debug!(index, error = %e, "script: step skipped");
                report.skipped += 1;
                continue;
            }
            Err(source) => return Err(ScriptError::Step { index, source }),
        };
        report.commits += actions.iter().filter(|a| matches!(a, Action::HistoryChanged { .. })).count();
        if actions.contains(&Action::RestoreRequested) {
            session.finish_restore();
            report.restores += 1;
        }
    }
    info!(steps = report.steps, commits = report.commits, skipped = report.skipped, "script: replay finished");
    Ok(report)
}

fn apply(
    session: &mut EditorSession,
    step: &Step,
    index: usize,
) -> Result<Result<Vec<Action>, EditorError>, ScriptError> {
    let layer_id = |session: &EditorSession, layer: usize| {
        session.layers().get(layer).map(|l| l.id).ok_or(ScriptError::NoLayer { index, layer })
    };
    let result = match step {
        Step::Tool { tool } => Ok(session.set_tool(*tool)),
        Step::Color { color } => Ok(session.set_color(color)),
        Step::StrokeWidth { width } => Ok(session.set_stroke_width(*width)),
        Step::PointerDown { x, y, button, modifiers } => {
            Ok(session.on_pointer_down(Point::new(*x, *y), *button, *modifiers))
        }
        Step::PointerMove { x, y, modifiers } => Ok(session.on_pointer_move(Point::new(*x, *y), *modifiers)),
        Step::PointerUp { x, y, button, modifiers } => {
            Ok(session.on_pointer_up(Point::new(*x, *y), *button, *modifiers))
        }
        Step::Drag { from, to } => {
            let none = Modifiers::default();
            let mut actions = session.on_pointer_down(*from, Button::Primary, none);
            actions.extend(session.on_pointer_move(*to, none));
            actions.extend(session.on_pointer_up(*to, Button::Primary, none));
            Ok(actions)
        }
        Step::Key { key, modifiers } => Ok(session.on_key_down(&Key::new(key), *modifiers)),
        Step::Undo => session.undo(),
        Step::Redo => session.redo(),
        Step::Element { preset } => session.add_element(*preset),
        Step::Image { width, height, data } => session.insert_image(data.clone(), *width, *height),
        Step::Stroke { points } => session.commit_stroke(points),
        Step::Object { shape, x, y, style } => {
            session.add_object(SceneObject::new(shape.clone(), Transform::at(*x, *y), style.clone()))
        }
        Step::Select { layer } => {
            let id = layer_id(session, *layer)?;
            Ok(session.select(&id))
        }
        Step::Deselect => Ok(session.deselect()),
        Step::Update { patch } => session.update_selected(patch),
        Step::Nudge { dx, dy } => session.nudge_selected(*dx, *dy),
        Step::Text { text } => match session.selection() {
            Some(id) => session.set_text(&id, text),
            None => Ok(Vec::new()),
        },
        Step::Font { size, family } => match session.selection() {
            Some(id) => session.set_font(&id, *size, family.as_deref()),
            None => Ok(Vec::new()),
        },
        Step::Filter { request } => session.apply_filter(*request),
        Step::Reorder { to } => match session.selection() {
            Some(id) => session.reorder(&id, *to),
            None => Ok(Vec::new()),
        },
        Step::ToggleVisibility { layer } => {
            let id = layer_id(session, *layer)?;
            session.toggle_visibility(&id)
        }
        Step::ToggleLock { layer } => {
            let id = layer_id(session, *layer)?;
            session.toggle_lock(&id)
        }
        Step::Rename { layer, name } => {
            let id = layer_id(session, *layer)?;
            session.rename(&id, name)
        }
        Step::Copy => Ok(session.copy()),
        Step::Paste => session.paste(),
        Step::Cut => session.cut(),
        Step::Delete => session.delete_selected(),
        Step::Background { color } => session.set_background(color),
        Step::Resize { width, height } => session.resize(*width, *height),
        Step::ResizePreset { preset } => session.resize_to(*preset),
        Step::Clear => session.clear(),
        Step::Zoom { factor } => Ok(session.zoom_by(*factor)),
        Step::ResetZoom => Ok(session.reset_zoom()),
        Step::RemoveBackground { result } => session.background_removal_request().and_then(|req| {
            let outcome = ImageOpOutcome { op: req.op, target: req.target, image: result.clone() };
            session.apply_image_op(outcome, None)
        }),
        Step::Enhance { result, width, height } => {
            let req = session.enhance_request(Vec::new());
            let outcome = ImageOpOutcome { op: req.op, target: req.target, image: result.clone() };
            session.apply_image_op(outcome, Some((*width, *height)))
        }
    };
    Ok(result)
}
