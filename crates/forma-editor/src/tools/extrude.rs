//! Extrude and extend tools: drag a solid's height or footprint

use forma_scene::{ObjectId, Scene};
use glam::{Vec2, Vec3};

use super::{NavigationGuard, ToolContext, ToolController, ToolKind, ToolState};
use crate::input::{InputEvent, Key, PointerButton};
use crate::selection::SelectionEngine;

/// Which scalar a resize tool edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Extrusion height, driven by vertical pointer motion
    Height,
    /// Footprint scale, driven by lateral pointer motion
    Footprint,
}

impl ResizeMode {
    /// Current value of the edited scalar for an object.
    fn value(&self, scene: &Scene, id: ObjectId) -> Option<f32> {
        let object = scene.get(id)?;
        match self {
            ResizeMode::Height => object.height(),
            ResizeMode::Footprint => Some(object.scale.x),
        }
    }

    /// Check if the object carries the tag for this mode.
    fn accepts(&self, scene: &Scene, id: ObjectId) -> bool {
        scene.get(id).is_some_and(|object| match self {
            ResizeMode::Height => object.tags.extrudable,
            ResizeMode::Footprint => object.tags.extendable,
        })
    }
}

/// A grab in progress
#[derive(Debug, Clone, Copy)]
struct Grab {
    start: Vec2,
    baseline: f32,
}

/// Resize tool shared by extrude (height) and extend (footprint).
///
/// Pointer-down on a tagged solid selects it and records the baseline value;
/// dragging maps pointer travel to a new value clamped to the configured
/// minimum; pointer-up deselects. Arrow keys nudge the last grabbed object
/// through the same clamped path.
#[derive(Debug)]
pub struct ResizeTool {
    mode: ResizeMode,
    enabled: bool,
    state: ToolState,
    selection: SelectionEngine,
    target: Option<ObjectId>,
    grab: Option<Grab>,
    guard: NavigationGuard,
}

impl ResizeTool {
    pub fn new(mode: ResizeMode) -> Self {
        Self {
            mode,
            enabled: false,
            state: ToolState::Idle,
            selection: SelectionEngine::new(),
            target: None,
            grab: None,
            guard: NavigationGuard::default(),
        }
    }

    pub fn mode(&self) -> ResizeMode {
        self.mode
    }

    /// Object the tool last grabbed, if still tracked.
    pub fn target(&self) -> Option<ObjectId> {
        self.target
    }

    fn grab(&mut self, position: Vec2, ctx: &mut ToolContext) -> bool {
        let Some(ray) = ctx.pointer_ray(position) else {
            return false;
        };
        let Some(id) = self.selection.pick(ctx.scene, &ray) else {
            return false;
        };
        if !self.mode.accepts(ctx.scene, id) {
            tracing::debug!("{} tool ignores object {}", self.name(), id);
            return false;
        }
        let Some(baseline) = self.mode.value(ctx.scene, id) else {
            return false;
        };

        self.selection.clear(ctx.scene);
        self.selection.add(ctx.scene, id);
        ctx.notifier
            .selection_changed(&self.selection.selected_objects());

        self.target = Some(id);
        self.grab = Some(Grab {
            start: position,
            baseline,
        });
        self.state = ToolState::Dragging;
        true
    }

    fn drag(&mut self, position: Vec2, ctx: &mut ToolContext) {
        let Some(grab) = self.grab else {
            return;
        };
        let resize = &ctx.config.resize;
        // screen y grows downward
        let delta = match self.mode {
            ResizeMode::Height => (grab.start.y - position.y) * resize.height_per_pixel,
            ResizeMode::Footprint => (position.x - grab.start.x) * resize.scale_per_pixel,
        };
        self.apply(grab.baseline + delta, ctx);
    }

    fn release(&mut self, ctx: &mut ToolContext) {
        self.grab = None;
        self.state = ToolState::Idle;
        if self.selection.clear(ctx.scene) {
            ctx.notifier.selection_changed(&[]);
        }
    }

    /// Set the edited scalar of the target, clamped to the minimum.
    fn apply(&mut self, value: f32, ctx: &mut ToolContext) -> bool {
        let Some(id) = self.target else {
            return false;
        };
        let value = value.max(ctx.config.resize.min_value);
        let result = match self.mode {
            ResizeMode::Height => ctx.scene.set_object_height(id, value),
            ResizeMode::Footprint => {
                let Some(scale) = ctx.scene.get(id).map(|o| o.scale) else {
                    return false;
                };
                ctx.scene
                    .set_object_scale(id, Vec3::new(value, value, scale.z))
            }
        };
        match result {
            Ok(()) => {
                self.selection.refresh_highlights(ctx.scene);
                true
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", self.name(), e);
                false
            }
        }
    }

    fn nudge(&mut self, direction: f32, ctx: &mut ToolContext) -> bool {
        let Some(current) = self.target.and_then(|id| self.mode.value(ctx.scene, id)) else {
            return false;
        };
        self.apply(current + direction * ctx.config.resize.nudge_step, ctx)
    }
}

impl ToolController for ResizeTool {
    fn kind(&self) -> ToolKind {
        match self.mode {
            ResizeMode::Height => ToolKind::Extrude,
            ResizeMode::Footprint => ToolKind::Extend,
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn state(&self) -> ToolState {
        self.state
    }

    fn enable(&mut self, ctx: &mut ToolContext) {
        if self.enabled {
            self.disable(ctx);
        }
        self.guard.acquire(ctx.controls, false);
        self.enabled = true;
        tracing::debug!("{} tool enabled", self.name());
    }

    fn disable(&mut self, ctx: &mut ToolContext) {
        if !self.enabled {
            return;
        }
        self.release(ctx);
        self.target = None;
        self.guard.release(ctx.controls);
        self.enabled = false;
        tracing::debug!("{} tool disabled", self.name());
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolContext) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                position,
                ..
            } if self.state == ToolState::Idle => self.grab(position, ctx),
            InputEvent::PointerMove { position, .. } if self.state == ToolState::Dragging => {
                self.drag(position, ctx);
                true
            }
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                ..
            } if self.state == ToolState::Dragging => {
                self.release(ctx);
                true
            }
            InputEvent::KeyDown {
                key: Key::Escape, ..
            } => {
                if let Some(grab) = self.grab {
                    self.apply(grab.baseline, ctx);
                }
                self.release(ctx);
                true
            }
            InputEvent::KeyDown { key, .. } => match key.nudge_direction() {
                Some(direction) => self.nudge(direction, ctx),
                None => false,
            },
            _ => false,
        }
    }

    fn on_scene_changed(&mut self, ctx: &mut ToolContext) {
        if self.selection.retain_present(ctx.scene) {
            ctx.notifier
                .selection_changed(&self.selection.selected_objects());
        }
        if let Some(id) = self.target
            && !ctx.scene.contains(id)
        {
            self.target = None;
            self.grab = None;
            self.state = ToolState::Idle;
        }
    }

    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection.selected_objects()
    }

    fn set_height(&mut self, height: f32, ctx: &mut ToolContext) -> bool {
        self.mode == ResizeMode::Height && self.apply(height, ctx)
    }

    fn set_scale(&mut self, scale: Vec3, ctx: &mut ToolContext) -> bool {
        if self.mode != ResizeMode::Footprint {
            return false;
        }
        let Some(id) = self.target else {
            return false;
        };
        let scale = scale.max(Vec3::splat(ctx.config.resize.min_value));
        match ctx.scene.set_object_scale(id, scale) {
            Ok(()) => {
                self.selection.refresh_highlights(ctx.scene);
                true
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", self.name(), e);
                false
            }
        }
    }
}
