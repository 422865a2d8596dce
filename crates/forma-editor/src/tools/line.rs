//! Line tool: click points, double-click to commit

use forma_cad::SolidAssembler;
use forma_core::WorldPoint;
use forma_scene::SceneObject;
use glam::Vec2;

use super::{NavigationGuard, ToolContext, ToolController, ToolKind, ToolState};
use crate::builder::ShapeBuilder;
use crate::click::{ClickResolution, ClickTimer};
use crate::config::LineOutput;
use crate::input::{InputEvent, Key, PointerButton, Timestamp};
use crate::projector::ProjectionTarget;

/// Polyline drawing tool.
///
/// The first click starts a session and captures a point right away. Later
/// clicks are held for the double-click window: an expired click places a
/// point, a second click inside the window commits the shape.
#[derive(Debug, Default)]
pub struct LineTool {
    enabled: bool,
    state: ToolState,
    session: Option<ShapeBuilder>,
    timer: ClickTimer,
    guard: NavigationGuard,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn on_click(&mut self, position: Vec2, time: Timestamp, ctx: &mut ToolContext) {
        match self.state {
            ToolState::Idle => self.start(position, time, ctx),
            _ => match self.timer.register(position, time) {
                ClickResolution::Single { expired } => {
                    if let Some(expired) = expired
                        && !expired.placed
                    {
                        self.place(expired.position, ctx);
                    }
                }
                ClickResolution::Double { .. } => self.finish(ctx),
            },
        }
    }

    fn start(&mut self, position: Vec2, time: Timestamp, ctx: &mut ToolContext) {
        let point = match ctx.project(position, ProjectionTarget::Initial) {
            Ok(point) => point,
            Err(e) => {
                tracing::debug!("Line start ignored: {}", e);
                return;
            }
        };

        let capacity = ctx.config.drawing.polyline_capacity;
        self.session = Some(ShapeBuilder::start(ctx.scene, point, capacity));
        self.timer = ClickTimer::new(ctx.config.input.double_click_ms);
        self.timer.register_placed(position, time);
        self.state = ToolState::Capturing;
    }

    fn continuation(&self, ctx: &ToolContext) -> Option<ProjectionTarget> {
        let anchor = self.session.as_ref()?.last()?;
        Some(ProjectionTarget::Continue {
            anchor,
            plane: ctx.config.projection.line_plane,
            clamp: true,
        })
    }

    fn place(&mut self, position: Vec2, ctx: &mut ToolContext) {
        let Some(target) = self.continuation(ctx) else {
            return;
        };
        match ctx.project(position, target) {
            Ok(point) => {
                if let Some(session) = self.session.as_mut() {
                    session.push(ctx.scene, point);
                    tracing::debug!("Captured point {} at {:?}", session.len(), point);
                }
            }
            Err(e) => tracing::debug!("Point placement ignored: {}", e),
        }
    }

    fn preview(&mut self, position: Vec2, ctx: &mut ToolContext) {
        let Some(target) = self.continuation(ctx) else {
            return;
        };
        if let Ok(point) = ctx.project(position, target)
            && let Some(session) = self.session.as_mut()
        {
            session.preview(ctx.scene, point);
        }
    }

    /// Commit the session as a solid, or drop it if it is too short.
    fn finish(&mut self, ctx: &mut ToolContext) {
        self.timer.cancel();
        self.state = ToolState::Idle;
        let Some(session) = self.session.take() else {
            return;
        };
        let points = session.finish(ctx.scene);

        let drawing = &ctx.config.drawing;
        let assembler = SolidAssembler::new(drawing.assembly_options());
        let result = match drawing.line_output {
            LineOutput::Fill => assembler.assemble_fill(&points),
            LineOutput::Extrusion => {
                assembler.assemble_extrusion(&points, drawing.extrusion_height)
            }
        };

        match result {
            Ok(shape) => {
                let object = SceneObject::from_assembled(shape, &drawing.style);
                if let Err(e) = ctx.history.commit(ctx.scene, object) {
                    tracing::warn!("Failed to commit line shape: {}", e);
                }
            }
            Err(e) => tracing::info!("Line shape discarded: {}", e),
        }
    }

    /// Discard the session. Returns true if there was one.
    fn discard(&mut self, ctx: &mut ToolContext) -> bool {
        self.timer.cancel();
        self.state = ToolState::Idle;
        match self.session.take() {
            Some(session) => {
                session.finish(ctx.scene);
                true
            }
            None => false,
        }
    }
}

impl ToolController for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
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
        self.timer = ClickTimer::new(ctx.config.input.double_click_ms);
        self.enabled = true;
        tracing::debug!("Line tool enabled");
    }

    fn disable(&mut self, ctx: &mut ToolContext) {
        if !self.enabled {
            return;
        }
        self.discard(ctx);
        self.guard.release(ctx.controls);
        self.enabled = false;
        tracing::debug!("Line tool disabled");
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolContext) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                position,
                time,
                ..
            } => {
                self.on_click(position, time, ctx);
                true
            }
            InputEvent::PointerMove { position, .. } if self.state == ToolState::Capturing => {
                self.preview(position, ctx);
                true
            }
            InputEvent::KeyDown {
                key: Key::Escape, ..
            } => {
                if self.discard(ctx) {
                    tracing::info!("Line drawing cancelled");
                    ctx.notifier.drawing_cancelled();
                }
                true
            }
            _ => false,
        }
    }

    fn captured_points(&self) -> &[WorldPoint] {
        self.session.as_ref().map(|s| s.points()).unwrap_or(&[])
    }

    fn update(&mut self, now: Timestamp, ctx: &mut ToolContext) {
        if let Some(pending) = self.timer.poll(now)
            && !pending.placed
        {
            self.place(pending.position, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::Harness;
    use glam::Vec3;

    fn pixel_of(harness: &Harness, world: Vec3) -> Vec2 {
        let ndc = harness.camera.project(world).unwrap();
        harness.viewport.to_pixel(ndc.truncate())
    }

    fn harness() -> Harness {
        let mut harness = Harness::new();
        harness.config.projection.standoff_distance = harness.camera.position.length();
        harness.config.projection.line_plane = crate::projector::ContinuationPlane::Horizontal;
        harness
    }

    #[test]
    fn test_first_click_starts_capturing() {
        let mut h = harness();
        let mut tool = LineTool::new();
        tool.enable(&mut h.ctx());
        assert!(!h.controls.enabled);

        let p = pixel_of(&h, Vec3::ZERO);
        tool.handle_event(&InputEvent::click(p, 0), &mut h.ctx());
        assert_eq!(tool.state(), ToolState::Capturing);
        assert_eq!(tool.captured_points().len(), 1);
        assert!(tool.captured_points()[0].abs_diff_eq(Vec3::ZERO, 1e-3));
        assert_eq!(h.scene.overlay_count(), 2);
    }

    #[test]
    fn test_move_only_updates_preview() {
        let mut h = harness();
        let mut tool = LineTool::new();
        tool.enable(&mut h.ctx());
        let p0 = pixel_of(&h, Vec3::ZERO);
        let p1 = pixel_of(&h, Vec3::new(1.0, 0.0, 0.0));
        tool.handle_event(&InputEvent::click(p0, 0), &mut h.ctx());
        tool.handle_event(&InputEvent::pointer_move(p1, 10), &mut h.ctx());
        assert_eq!(tool.captured_points().len(), 1);
        assert_eq!(h.scene.overlay_count(), 2);
    }

    #[test]
    fn test_expired_click_placed_by_update() {
        let mut h = harness();
        let mut tool = LineTool::new();
        tool.enable(&mut h.ctx());
        tool.handle_event(&InputEvent::click(pixel_of(&h, Vec3::ZERO), 0), &mut h.ctx());
        let p1 = pixel_of(&h, Vec3::new(2.0, 0.0, 0.0));
        tool.handle_event(&InputEvent::click(p1, 500), &mut h.ctx());
        assert_eq!(tool.captured_points().len(), 1);

        tool.update(600, &mut h.ctx());
        assert_eq!(tool.captured_points().len(), 1);
        tool.update(800, &mut h.ctx());
        assert_eq!(tool.captured_points().len(), 2);
        assert!(tool.captured_points()[1].abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-3));
    }

    #[test]
    fn test_double_click_with_one_point_resets() {
        let mut h = harness();
        let mut tool = LineTool::new();
        tool.enable(&mut h.ctx());
        let p = pixel_of(&h, Vec3::ZERO);
        tool.handle_event(&InputEvent::click(p, 0), &mut h.ctx());
        tool.handle_event(&InputEvent::click(p, 100), &mut h.ctx());
        assert_eq!(tool.state(), ToolState::Idle);
        assert!(h.scene.is_empty());
        assert_eq!(h.history.len(), 0);
        assert_eq!(h.scene.overlay_count(), 0);
    }

    #[test]
    fn test_disable_restores_navigation_and_discards() {
        let mut h = harness();
        let mut tool = LineTool::new();
        tool.enable(&mut h.ctx());
        tool.handle_event(&InputEvent::click(pixel_of(&h, Vec3::ZERO), 0), &mut h.ctx());
        tool.disable(&mut h.ctx());
        assert!(h.controls.enabled);
        assert_eq!(h.scene.overlay_count(), 0);
        assert!(!tool.handle_event(&InputEvent::click(Vec2::ZERO, 1000), &mut h.ctx()));
    }

    #[test]
    fn test_enable_twice_keeps_saved_flag() {
        let mut h = harness();
        let mut tool = LineTool::new();
        tool.enable(&mut h.ctx());
        tool.enable(&mut h.ctx());
        tool.disable(&mut h.ctx());
        assert!(h.controls.enabled);
    }
}
