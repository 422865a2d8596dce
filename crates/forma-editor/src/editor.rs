//! Editor facade
//!
//! Owns the scene, camera, history and tools, and is the single entry point
//! the surrounding UI talks to.

use forma_core::Viewport;
use forma_scene::{Camera, CameraControls, ObjectId, Scene};
use glam::Vec3;

use crate::arbiter::ToolArbiter;
use crate::config::EditorConfig;
use crate::history::HistoryStack;
use crate::input::{InputEvent, Timestamp};
use crate::tools::{Notifier, ToolContext, ToolKind};

/// Headless geometry-authoring editor
#[derive(Debug)]
pub struct Editor {
    scene: Scene,
    camera: Camera,
    controls: CameraControls,
    viewport: Viewport,
    history: HistoryStack,
    arbiter: ToolArbiter,
    config: EditorConfig,
    notifier: Notifier,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::new())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let viewport = Viewport::default();
        Self {
            scene: Scene::new(),
            camera: Camera::new(viewport.aspect()),
            controls: CameraControls::default(),
            viewport,
            history: HistoryStack::new(config.history.max_entries),
            arbiter: ToolArbiter::new(),
            config,
            notifier: Notifier::default(),
        }
    }

    /// Split into the arbiter and a context borrowing everything else.
    fn split(&mut self) -> (&mut ToolArbiter, ToolContext<'_>) {
        let ctx = ToolContext {
            scene: &mut self.scene,
            camera: &mut self.camera,
            controls: &mut self.controls,
            history: &mut self.history,
            viewport: self.viewport,
            config: &self.config,
            notifier: &mut self.notifier,
        };
        (&mut self.arbiter, ctx)
    }

    /// Feed one input event. Returns true if it was consumed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Resize { width, height } => {
                self.resize(width, height);
                true
            }
            InputEvent::KeyDown { key, modifiers, .. }
                if modifiers.command() && key.is_char('z') =>
            {
                if modifiers.shift {
                    self.redo();
                } else {
                    self.undo();
                }
                true
            }
            _ => {
                let (arbiter, mut ctx) = self.split();
                arbiter.dispatch(event, &mut ctx)
            }
        }
    }

    /// Per-frame update; fires expired click timers.
    pub fn update(&mut self, now: Timestamp) {
        let (arbiter, mut ctx) = self.split();
        arbiter.update(now, &mut ctx);
    }

    fn resize(&mut self, width: f32, height: f32) {
        match Viewport::new(width, height) {
            Ok(viewport) => {
                self.viewport = viewport;
                self.camera.update_aspect(viewport.aspect());
            }
            Err(e) => tracing::warn!("Ignoring resize to {}x{}: {}", width, height, e),
        }
    }

    pub fn activate_tool(&mut self, kind: ToolKind) -> bool {
        let (arbiter, mut ctx) = self.split();
        arbiter.activate(kind, &mut ctx)
    }

    pub fn deactivate_tool(&mut self) -> bool {
        let (arbiter, mut ctx) = self.split();
        arbiter.deactivate(&mut ctx)
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.arbiter.active()
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.scene) {
            return false;
        }
        self.scene_changed();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.scene) {
            return false;
        }
        self.scene_changed();
        true
    }

    fn scene_changed(&mut self) {
        let (arbiter, mut ctx) = self.split();
        arbiter.on_scene_changed(&mut ctx);
    }

    /// Set the height of the active resize tool's target.
    pub fn set_height(&mut self, height: f32) -> bool {
        let (arbiter, mut ctx) = self.split();
        arbiter.set_height(height, &mut ctx)
    }

    /// Set the footprint scale of the active resize tool's target.
    pub fn set_scale(&mut self, scale: Vec3) -> bool {
        let (arbiter, mut ctx) = self.split();
        arbiter.set_scale(scale, &mut ctx)
    }

    pub fn selected_objects(&self) -> Vec<ObjectId> {
        self.arbiter.selected_objects()
    }

    pub fn on_selection_changed(&mut self, callback: impl FnMut(&[ObjectId]) + 'static) {
        self.notifier.set_selection_changed(Box::new(callback));
    }

    pub fn on_drawing_cancelled(&mut self, callback: impl FnMut() + 'static) {
        self.notifier.set_drawing_cancelled(Box::new(callback));
    }

    /// Remove an object from outside the tools. Returns false if it was not
    /// in the scene.
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        if self.scene.remove(id).is_none() {
            return false;
        }
        tracing::info!("Deleted object {}", id);
        self.scene_changed();
        true
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn controls(&self) -> &CameraControls {
        &self.controls
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn arbiter(&self) -> &ToolArbiter {
        &self.arbiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, Modifiers};
    use glam::Vec2;

    fn ctrl_z(shift: bool, time: Timestamp) -> InputEvent {
        InputEvent::KeyDown {
            key: Key::Char('z'),
            modifiers: Modifiers {
                shift,
                ..Modifiers::CTRL
            },
            time,
        }
    }

    #[test]
    fn test_resize_updates_viewport_and_aspect() {
        let mut editor = Editor::default();
        assert!(editor.handle_event(&InputEvent::Resize {
            width: 200.0,
            height: 100.0,
        }));
        assert_eq!(editor.viewport().width, 200.0);
        assert_eq!(editor.camera().aspect, 2.0);

        editor.handle_event(&InputEvent::Resize {
            width: 0.0,
            height: 100.0,
        });
        assert_eq!(editor.viewport().width, 200.0);
    }

    #[test]
    fn test_undo_keys_without_history() {
        let mut editor = Editor::default();
        assert!(editor.handle_event(&ctrl_z(false, 0)));
        assert!(editor.handle_event(&ctrl_z(true, 10)));
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_events_ignored_without_active_tool() {
        let mut editor = Editor::default();
        assert!(!editor.handle_event(&InputEvent::click(Vec2::new(10.0, 10.0), 0)));
        assert!(editor.scene().is_empty());
    }
}
