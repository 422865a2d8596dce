//! Scripted input replay
//!
//! A replay script is a RON document listing tool switches, input events and
//! clock ticks. Running it drives a headless [`Editor`] and yields a summary
//! of the resulting scene.

use forma_cad::ShapeKind;
use forma_core::Viewport;
use forma_scene::{Camera, ObjectId};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{EditorConfig, SharedConfig};
use crate::editor::Editor;
use crate::input::{InputEvent, Timestamp};
use crate::tools::ToolKind;

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Script parse error: {0}")]
    Parse(String),

    #[error("Summary serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Camera placement for a script
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraSetup {
    pub position: Vec3,
    pub target: Vec3,
}

/// One scripted action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReplayStep {
    Activate(ToolKind),
    Deactivate,
    Event(InputEvent),
    /// Advance the frame clock
    Update(Timestamp),
    Undo,
    Redo,
    /// Delete the n-th object in insertion order
    Delete(usize),
    SetHeight(f32),
    SetScale(Vec3),
}

/// A replay script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub viewport: Option<Viewport>,
    pub camera: Option<CameraSetup>,
    pub config: Option<EditorConfig>,
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    pub fn parse(content: &str) -> Result<Self, ReplayError> {
        ron::from_str(content).map_err(|e| ReplayError::Parse(e.to_string()))
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Build the editor described by the script header. Settings embedded in
    /// the script replace the stored ones.
    pub fn editor(&self, settings: &SharedConfig) -> Editor {
        let mut editor = Editor::new(settings.read().resolve(self.config.as_ref()));
        if let Some(viewport) = self.viewport {
            editor.handle_event(&InputEvent::Resize {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if let Some(setup) = self.camera {
            let aspect = editor.viewport().aspect();
            *editor.camera_mut() = Camera::looking_at(setup.position, setup.target, aspect);
        }
        editor
    }

    /// Run every step against a fresh editor.
    pub fn run(&self, settings: &SharedConfig) -> (Editor, ReplaySummary) {
        let mut editor = self.editor(settings);
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!("Step {}: {:?}", index, step);
            apply(&mut editor, step);
        }
        let summary = ReplaySummary::of(&editor);
        (editor, summary)
    }
}

fn apply(editor: &mut Editor, step: &ReplayStep) {
    match step {
        ReplayStep::Activate(kind) => {
            editor.activate_tool(*kind);
        }
        ReplayStep::Deactivate => {
            editor.deactivate_tool();
        }
        ReplayStep::Event(event) => {
            editor.handle_event(event);
        }
        ReplayStep::Update(now) => editor.update(*now),
        ReplayStep::Undo => {
            editor.undo();
        }
        ReplayStep::Redo => {
            editor.redo();
        }
        ReplayStep::Delete(index) => {
            let id = editor.scene().object_ids().get(*index).copied();
            match id {
                Some(id) => {
                    editor.delete_object(id);
                }
                None => tracing::warn!("No object at index {}", index),
            }
        }
        ReplayStep::SetHeight(height) => {
            editor.set_height(*height);
        }
        ReplayStep::SetScale(scale) => {
            editor.set_scale(*scale);
        }
    }
}

/// Summary of a committed object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub name: String,
    pub kind: Option<ShapeKind>,
    pub height: Option<f32>,
    pub position: Vec3,
}

/// Scene state after a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub objects: Vec<ObjectSummary>,
    pub history_len: usize,
    pub cursor: Option<usize>,
    pub selection: Vec<ObjectId>,
    pub active_tool: Option<ToolKind>,
}

impl ReplaySummary {
    pub fn of(editor: &Editor) -> Self {
        Self {
            objects: editor
                .scene()
                .objects()
                .map(|object| ObjectSummary {
                    id: object.id,
                    name: object.name.clone(),
                    kind: object.kind(),
                    height: object.height(),
                    position: object.world_position(),
                })
                .collect(),
            history_len: editor.history().len(),
            cursor: editor.history().cursor(),
            selection: editor.selected_objects(),
            active_tool: editor.active_tool(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::create_shared_config;

    /// Stored settings backed by a file that does not exist yet
    fn stored_settings() -> SharedConfig {
        let path = std::env::temp_dir()
            .join(format!("forma-replay-{}", uuid::Uuid::new_v4()))
            .join("config.ron");
        create_shared_config(Some(path))
    }

    const SCRIPT: &str = r#"(
        viewport: Some((width: 100.0, height: 100.0)),
        camera: Some((position: (0.0, 10.0, 10.0), target: (0.0, 0.0, 0.0))),
        steps: [
            Activate(Rectangle),
            Event(PointerDown(button: Primary, position: (30.0, 40.0), time: 0)),
            Event(PointerMove(position: (70.0, 60.0), time: 10)),
            Event(PointerUp(button: Primary, position: (70.0, 60.0), time: 20)),
            Undo,
            Redo,
        ],
    )"#;

    #[test]
    fn test_script_parses_and_runs() {
        let script = ReplayScript::parse(SCRIPT).unwrap();
        assert_eq!(script.steps.len(), 6);

        let (editor, summary) = script.run(&stored_settings());
        assert_eq!(editor.viewport().width, 100.0);
        assert_eq!(summary.objects.len(), 1);
        assert_eq!(summary.objects[0].kind, Some(ShapeKind::Fill));
        assert_eq!(summary.history_len, 1);
        assert_eq!(summary.cursor, Some(0));
        assert_eq!(summary.active_tool, Some(ToolKind::Rectangle));

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"history_len\": 1"));
    }

    #[test]
    fn test_empty_script() {
        let script = ReplayScript::parse("()").unwrap();
        let (_, summary) = script.run(&stored_settings());
        assert!(summary.objects.is_empty());
        assert_eq!(summary.cursor, None);
    }

    #[test]
    fn test_bad_script_reports_parse_error() {
        assert!(matches!(
            ReplayScript::parse("(steps: [Explode])"),
            Err(ReplayError::Parse(_))
        ));
    }

    #[test]
    fn test_stored_settings_apply_unless_scripted() {
        let settings = stored_settings();
        settings.write().config_mut().drawing.box_height = Some(1.0);

        let script = ReplayScript::parse(SCRIPT).unwrap();
        let (_, summary) = script.run(&settings);
        assert_eq!(summary.objects[0].kind, Some(ShapeKind::Box));

        let mut scripted = script.clone();
        scripted.config = Some(EditorConfig::new());
        let (editor, summary) = scripted.run(&settings);
        assert_eq!(summary.objects[0].kind, Some(ShapeKind::Fill));
        assert_eq!(editor.config().drawing.box_height, None);
    }
}
