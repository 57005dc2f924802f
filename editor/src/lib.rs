//! Scene and history engine for the PixelCraft image editor.
//!
//! This crate is the headless core of the editor. It owns the scene graph,
//! the bounded snapshot history, the selection and clipboard, and the tool
//! state machine that turns normalized pointer and keyboard events into scene
//! mutations. Rendering, image codecs and the generative-image service are
//! external collaborators: the host drives an [`session::EditorSession`] and
//! reacts to the [`session::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | `EditorSession`: event dispatch and every user-level operation |
//! | [`doc`] | Scene objects, the ordered `Scene`, sparse `ObjectPatch` edits |
//! | [`history`] | Bounded undo/redo stack of serialized snapshots |
//! | [`selection`] | Active object and single-slot clipboard |
//! | [`input`] | Tools, modifiers, keys and the gesture state machine |
//! | [`hit`] | Front-to-back hit testing |
//! | [`camera`] | Zoom and screen/world conversion |
//! | [`filter`] | Image filter descriptors carried by image objects |
//! | [`imageop`] | Generative image operations behind an async client seam |
//! | [`config`] | Environment-driven editor defaults |
//! | [`error`] | Engine error type and error codes |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod error;
pub mod filter;
pub mod history;
pub mod hit;
pub mod imageop;
pub mod input;
pub mod selection;
pub mod session;

pub use doc::{ObjectId, Scene, SceneObject};
pub use error::EditorError;
pub use session::{Action, EditorSession};
