//! Forma Editor
//!
//! Interactive geometry authoring: turns pointer and keyboard input into
//! committed solids, selections and undoable scene edits.
//!
//! # Architecture
//!
//! - [`editor::Editor`] - Facade owning the scene, camera, history and tools
//! - [`arbiter::ToolArbiter`] - Keeps exactly one tool active
//! - [`tools`] - Line, rectangle, extrude, extend, select and pan controllers
//! - [`projector::PointerProjector`] - Pointer position to world point
//! - [`builder::ShapeBuilder`] - In-progress polyline with live preview
//! - [`selection::SelectionEngine`] - Picking, marquee and highlights
//! - [`history::HistoryStack`] - Linear undo/redo of committed objects
//!
//! # Example
//!
//! ```ignore
//! use forma_editor::{Editor, InputEvent, ToolKind};
//!
//! let mut editor = Editor::default();
//! editor.activate_tool(ToolKind::Line);
//! editor.handle_event(&InputEvent::click(glam::Vec2::new(640.0, 360.0), 0));
//! editor.update(300);
//! ```

pub mod arbiter;
pub mod builder;
pub mod click;
pub mod config;
pub mod editor;
pub mod history;
pub mod input;
pub mod projector;
pub mod replay;
pub mod router;
pub mod selection;
pub mod tools;

pub use arbiter::ToolArbiter;
pub use config::{ConfigManager, EditorConfig, SharedConfig};
pub use editor::Editor;
pub use history::HistoryStack;
pub use input::{EventKind, InputEvent, Key, Modifiers, PointerButton, Timestamp};
pub use projector::{ContinuationPlane, PointerProjector, ProjectionError};
pub use replay::{ReplayScript, ReplaySummary};
pub use selection::SelectionEngine;
pub use tools::{ToolController, ToolKind, ToolState};
