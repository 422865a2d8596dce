//! Rectangle tool: drag from corner to corner

use forma_cad::{PlaneBasis, SolidAssembler, rectangle_corners};
use forma_core::WorldPoint;
use forma_scene::{OverlayId, OverlayKind, SceneObject};
use glam::Vec2;

use super::{NavigationGuard, ToolContext, ToolController, ToolKind, ToolState};
use crate::input::{InputEvent, Key, PointerButton};
use crate::projector::{ContinuationPlane, ProjectionTarget};

/// The rectangle being dragged out
#[derive(Debug)]
struct RectangleDrag {
    anchor: WorldPoint,
    corner: WorldPoint,
    plane: PlaneBasis,
    preview: OverlayId,
}

impl RectangleDrag {
    fn outline(&self) -> Vec<WorldPoint> {
        let corners = rectangle_corners(self.anchor, self.corner, &self.plane);
        let mut points = corners.to_vec();
        points.push(corners[0]);
        points
    }
}

/// Rectangle drawing tool.
///
/// Pointer-down fixes the first corner, every move resizes the preview, and
/// pointer-up commits. With a configured box height the result is a box.
#[derive(Debug, Default)]
pub struct RectangleTool {
    enabled: bool,
    state: ToolState,
    drag: Option<RectangleDrag>,
    guard: NavigationGuard,
}

impl RectangleTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corners of the rectangle being dragged.
    pub fn corners(&self) -> Option<[WorldPoint; 4]> {
        self.drag
            .as_ref()
            .map(|d| rectangle_corners(d.anchor, d.corner, &d.plane))
    }

    fn begin(&mut self, position: Vec2, ctx: &mut ToolContext) {
        let anchor = match ctx.project(position, ProjectionTarget::Initial) {
            Ok(point) => point,
            Err(e) => {
                tracing::debug!("Rectangle start ignored: {}", e);
                return;
            }
        };

        let mode = ctx.config.projection.rectangle_plane;
        let plane = match mode {
            ContinuationPlane::Horizontal => PlaneBasis::horizontal(anchor),
            _ => {
                let normal = mode.plane(ctx.camera, anchor).normal;
                PlaneBasis::from_normal(anchor, normal)
                    .unwrap_or_else(|_| PlaneBasis::horizontal(anchor))
            }
        };
        let preview = ctx.scene.add_overlay(OverlayKind::Polyline {
            points: vec![anchor; 5],
        });

        self.drag = Some(RectangleDrag {
            anchor,
            corner: anchor,
            plane,
            preview,
        });
        self.state = ToolState::Dragging;
    }

    fn resize(&mut self, position: Vec2, ctx: &mut ToolContext) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let target = ProjectionTarget::Continue {
            anchor: drag.anchor,
            plane: ctx.config.projection.rectangle_plane,
            clamp: false,
        };
        if let Ok(corner) = ctx.project(position, target) {
            drag.corner = corner;
            ctx.scene.update_overlay(
                drag.preview,
                OverlayKind::Polyline {
                    points: drag.outline(),
                },
            );
        }
    }

    fn commit(&mut self, position: Vec2, ctx: &mut ToolContext) {
        self.resize(position, ctx);
        self.state = ToolState::Idle;
        let Some(drag) = self.drag.take() else {
            return;
        };
        ctx.scene.remove_overlay(drag.preview);

        let drawing = &ctx.config.drawing;
        let assembler = SolidAssembler::new(drawing.assembly_options());
        let result =
            assembler.assemble_rectangle(drag.anchor, drag.corner, &drag.plane, drawing.box_height);
        match result {
            Ok(shape) => {
                let object = SceneObject::from_assembled(shape, &drawing.style);
                if let Err(e) = ctx.history.commit(ctx.scene, object) {
                    tracing::warn!("Failed to commit rectangle: {}", e);
                }
            }
            Err(e) => tracing::info!("Rectangle discarded: {}", e),
        }
    }

    /// Drop the drag. Returns true if there was one.
    fn discard(&mut self, ctx: &mut ToolContext) -> bool {
        self.state = ToolState::Idle;
        match self.drag.take() {
            Some(drag) => {
                ctx.scene.remove_overlay(drag.preview);
                true
            }
            None => false,
        }
    }
}

impl ToolController for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
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
        tracing::debug!("Rectangle tool enabled");
    }

    fn disable(&mut self, ctx: &mut ToolContext) {
        if !self.enabled {
            return;
        }
        self.discard(ctx);
        self.guard.release(ctx.controls);
        self.enabled = false;
        tracing::debug!("Rectangle tool disabled");
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
            } if self.state == ToolState::Idle => {
                self.begin(position, ctx);
                true
            }
            InputEvent::PointerMove { position, .. } if self.state == ToolState::Dragging => {
                self.resize(position, ctx);
                true
            }
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                position,
                ..
            } if self.state == ToolState::Dragging => {
                self.commit(position, ctx);
                true
            }
            InputEvent::KeyDown {
                key: Key::Escape, ..
            } => {
                if self.discard(ctx) {
                    tracing::info!("Rectangle drawing cancelled");
                    ctx.notifier.drawing_cancelled();
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::Harness;
    use forma_cad::ShapeKind;
    use glam::Vec3;

    fn pixel_of(harness: &Harness, world: Vec3) -> Vec2 {
        let ndc = harness.camera.project(world).unwrap();
        harness.viewport.to_pixel(ndc.truncate())
    }

    fn harness() -> Harness {
        let mut harness = Harness::new();
        harness.config.projection.standoff_distance = harness.camera.position.length();
        harness
    }

    fn drag(tool: &mut RectangleTool, h: &mut Harness, from: Vec3, to: Vec3) {
        let a = pixel_of(h, from);
        let b = pixel_of(h, to);
        tool.handle_event(&InputEvent::click(a, 0), &mut h.ctx());
        tool.handle_event(&InputEvent::pointer_move((a + b) * 0.5, 10), &mut h.ctx());
        tool.handle_event(&InputEvent::pointer_move(b, 20), &mut h.ctx());
        tool.handle_event(&InputEvent::release(b, 30), &mut h.ctx());
    }

    #[test]
    fn test_drag_commits_fill() {
        let mut h = harness();
        let mut tool = RectangleTool::new();
        tool.enable(&mut h.ctx());
        drag(&mut tool, &mut h, Vec3::ZERO, Vec3::new(2.0, 0.0, 1.0));

        assert_eq!(tool.state(), ToolState::Idle);
        assert_eq!(h.scene.len(), 1);
        assert_eq!(h.history.cursor(), Some(0));
        assert_eq!(h.scene.overlay_count(), 0);
        let object = h.scene.objects().next().unwrap();
        assert_eq!(object.kind(), Some(ShapeKind::Fill));
        let size = object.world_bounds().size();
        assert!((size.x - 2.0).abs() < 1e-2);
        assert!((size.z - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_box_height_commits_box() {
        let mut h = harness();
        h.config.drawing.box_height = Some(1.5);
        let mut tool = RectangleTool::new();
        tool.enable(&mut h.ctx());
        drag(&mut tool, &mut h, Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));

        let object = h.scene.objects().next().unwrap();
        assert_eq!(object.kind(), Some(ShapeKind::Box));
        assert_eq!(object.height(), Some(1.5));
    }

    #[test]
    fn test_click_without_drag_commits_nothing() {
        let mut h = harness();
        let mut tool = RectangleTool::new();
        tool.enable(&mut h.ctx());
        let p = pixel_of(&h, Vec3::ZERO);
        tool.handle_event(&InputEvent::click(p, 0), &mut h.ctx());
        tool.handle_event(&InputEvent::release(p, 50), &mut h.ctx());
        assert!(h.scene.is_empty());
        assert_eq!(h.history.len(), 0);
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut h = harness();
        let cancelled = std::rc::Rc::new(std::cell::Cell::new(0));
        let counter = cancelled.clone();
        h.notifier
            .set_drawing_cancelled(Box::new(move || counter.set(counter.get() + 1)));

        let mut tool = RectangleTool::new();
        tool.enable(&mut h.ctx());
        tool.handle_event(&InputEvent::click(pixel_of(&h, Vec3::ZERO), 0), &mut h.ctx());
        assert!(tool.corners().is_some());
        tool.handle_event(&InputEvent::key(Key::Escape, 10), &mut h.ctx());

        assert_eq!(tool.state(), ToolState::Idle);
        assert_eq!(h.scene.overlay_count(), 0);
        assert_eq!(cancelled.get(), 1);
    }
}
