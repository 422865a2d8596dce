//! Tool controllers
//!
//! One controller per tool kind. A controller is a small state machine that
//! receives input only while enabled, and spatial tools suspend camera
//! navigation for as long as they are enabled.

mod extrude;
mod line;
mod pan;
mod rectangle;
mod select;

pub use extrude::{ResizeMode, ResizeTool};
pub use line::LineTool;
pub use pan::PanTool;
pub use rectangle::RectangleTool;
pub use select::SelectTool;

use forma_core::{Ray, Viewport, WorldPoint};
use forma_scene::{Camera, CameraControls, ObjectId, Scene};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::history::HistoryStack;
use crate::input::{EventKind, InputEvent, Timestamp};
use crate::projector::{PointerProjector, ProjectionResult, ProjectionTarget};

/// Kind of tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Click points, double-click to finish
    Line,
    /// Drag from corner to corner
    Rectangle,
    /// Drag a solid's height
    Extrude,
    /// Drag a solid's footprint
    Extend,
    /// Click or marquee selection
    Select,
    /// Drag to move the camera
    Pan,
}

impl ToolKind {
    /// Get the display name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Line => "Line",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Extrude => "Extrude",
            ToolKind::Extend => "Extend",
            ToolKind::Select => "Select",
            ToolKind::Pan => "Pan",
        }
    }

    /// Get all tool kinds
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Line,
            ToolKind::Rectangle,
            ToolKind::Extrude,
            ToolKind::Extend,
            ToolKind::Select,
            ToolKind::Pan,
        ]
    }

    /// Check if this tool takes the pointer away from camera navigation
    pub fn is_spatial(&self) -> bool {
        !matches!(self, ToolKind::Pan)
    }
}

/// Interaction state of a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolState {
    #[default]
    Idle,
    /// Collecting points between clicks
    Capturing,
    /// Pointer held down
    Dragging,
}

/// Selection-changed callback
pub type SelectionCallback = Box<dyn FnMut(&[ObjectId])>;

/// Drawing-cancelled callback
pub type CancelCallback = Box<dyn FnMut()>;

/// Callbacks into the surrounding UI
#[derive(Default)]
pub struct Notifier {
    selection_changed: Option<SelectionCallback>,
    drawing_cancelled: Option<CancelCallback>,
}

impl Notifier {
    pub fn set_selection_changed(&mut self, callback: SelectionCallback) {
        self.selection_changed = Some(callback);
    }

    pub fn set_drawing_cancelled(&mut self, callback: CancelCallback) {
        self.drawing_cancelled = Some(callback);
    }

    pub fn selection_changed(&mut self, selected: &[ObjectId]) {
        tracing::debug!("Selection changed: {} objects", selected.len());
        if let Some(callback) = self.selection_changed.as_mut() {
            callback(selected);
        }
    }

    pub fn drawing_cancelled(&mut self) {
        if let Some(callback) = self.drawing_cancelled.as_mut() {
            callback();
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("selection_changed", &self.selection_changed.is_some())
            .field("drawing_cancelled", &self.drawing_cancelled.is_some())
            .finish()
    }
}

/// Everything a tool may read or mutate while handling an event
pub struct ToolContext<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a mut Camera,
    pub controls: &'a mut CameraControls,
    pub history: &'a mut HistoryStack,
    pub viewport: Viewport,
    pub config: &'a EditorConfig,
    pub notifier: &'a mut Notifier,
}

impl ToolContext<'_> {
    /// Ray from the camera through a pixel, if one can be cast.
    pub fn pointer_ray(&self, pixel: Vec2) -> Option<Ray> {
        match self.camera.screen_to_ray(pixel, &self.viewport) {
            Ok(ray) => Some(ray),
            Err(e) => {
                tracing::warn!("Cannot cast pointer ray: {}", e);
                None
            }
        }
    }

    /// Project a pointer position with the configured projection settings.
    pub fn project(&self, pixel: Vec2, target: ProjectionTarget) -> ProjectionResult<WorldPoint> {
        PointerProjector::new(self.config.projection).project(
            pixel,
            &self.viewport,
            &*self.camera,
            &*self.scene,
            target,
        )
    }
}

/// Saves the camera navigation flag while a spatial tool is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationGuard {
    saved: Option<bool>,
}

impl NavigationGuard {
    /// Remember the current flag and force it to `enabled`.
    pub fn acquire(&mut self, controls: &mut CameraControls, enabled: bool) {
        if self.saved.is_none() {
            self.saved = Some(controls.enabled);
        }
        controls.enabled = enabled;
    }

    /// Put the remembered flag back.
    pub fn release(&mut self, controls: &mut CameraControls) {
        if let Some(saved) = self.saved.take() {
            controls.enabled = saved;
        }
    }

    pub fn is_held(&self) -> bool {
        self.saved.is_some()
    }
}

/// A tool that owns the pointer while it is enabled.
///
/// `enable` must be idempotent: enabling an enabled tool disables it first.
/// After `disable` returns the tool is Idle, holds no transient overlays and
/// has restored the navigation flag.
pub trait ToolController {
    /// Returns the kind of this tool.
    fn kind(&self) -> ToolKind;

    /// Returns the display name of this tool.
    fn name(&self) -> &str {
        self.kind().name()
    }

    /// Returns whether this tool is currently enabled.
    fn is_enabled(&self) -> bool;

    /// Returns the interaction state.
    fn state(&self) -> ToolState;

    /// Event kinds this tool listens to while enabled.
    fn subscriptions(&self) -> &'static [EventKind] {
        EventKind::ALL_TOOL_EVENTS
    }

    /// Take over the pointer.
    fn enable(&mut self, ctx: &mut ToolContext);

    /// Release the pointer and dispose transient state.
    fn disable(&mut self, ctx: &mut ToolContext);

    /// Handle an input event. Returns true if the event was consumed.
    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolContext) -> bool;

    /// Per-frame update.
    fn update(&mut self, _now: Timestamp, _ctx: &mut ToolContext) {}

    /// Called after objects were removed or restored outside the tool.
    fn on_scene_changed(&mut self, _ctx: &mut ToolContext) {}

    /// Points captured by an in-progress drawing session.
    fn captured_points(&self) -> &[WorldPoint] {
        &[]
    }

    /// Objects selected by this tool.
    fn selected_objects(&self) -> Vec<ObjectId> {
        Vec::new()
    }

    /// Set the height of the tool's target. Returns false if unsupported.
    fn set_height(&mut self, _height: f32, _ctx: &mut ToolContext) -> bool {
        false
    }

    /// Set the footprint scale of the tool's target. Returns false if
    /// unsupported.
    fn set_scale(&mut self, _scale: Vec3, _ctx: &mut ToolContext) -> bool {
        false
    }
}

/// Create the controller for a tool kind.
pub fn create_tool(kind: ToolKind) -> Box<dyn ToolController> {
    match kind {
        ToolKind::Line => Box::new(LineTool::new()),
        ToolKind::Rectangle => Box::new(RectangleTool::new()),
        ToolKind::Extrude => Box::new(ResizeTool::new(ResizeMode::Height)),
        ToolKind::Extend => Box::new(ResizeTool::new(ResizeMode::Footprint)),
        ToolKind::Select => Box::new(SelectTool::new()),
        ToolKind::Pan => Box::new(PanTool::new()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_guard_restores_flag() {
        let mut controls = CameraControls::new(true);
        let mut guard = NavigationGuard::default();
        guard.acquire(&mut controls, false);
        assert!(!controls.enabled);
        // second acquire keeps the first saved value
        guard.acquire(&mut controls, false);
        guard.release(&mut controls);
        assert!(controls.enabled);
        assert!(!guard.is_held());
    }

    #[test]
    fn test_tool_kinds() {
        assert_eq!(ToolKind::all().len(), 6);
        assert!(ToolKind::Line.is_spatial());
        assert!(!ToolKind::Pan.is_spatial());
        for kind in ToolKind::all() {
            let tool = create_tool(*kind);
            assert_eq!(tool.kind(), *kind);
            assert!(!tool.is_enabled());
            assert_eq!(tool.state(), ToolState::Idle);
        }
    }
}
