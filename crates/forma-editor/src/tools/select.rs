//! Select tool: click picking and marquee selection

use forma_scene::{ObjectId, OverlayId, OverlayKind};
use glam::Vec2;

use super::{NavigationGuard, ToolContext, ToolController, ToolKind, ToolState};
use crate::input::{InputEvent, Key, PointerButton};
use crate::selection::SelectionEngine;

/// Pointer press being tracked
#[derive(Debug, Clone, Copy)]
struct Press {
    start: Vec2,
    additive: bool,
}

/// Selection tool.
///
/// A press without shift clears the selection. Releasing close to the press
/// position picks the object under the pointer; releasing after a drag
/// selects every object whose position falls inside the dragged rectangle.
#[derive(Debug, Default)]
pub struct SelectTool {
    enabled: bool,
    state: ToolState,
    selection: SelectionEngine,
    press: Option<Press>,
    marquee: Option<OverlayId>,
    guard: NavigationGuard,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current marquee overlay, if one is shown.
    pub fn marquee(&self) -> Option<OverlayId> {
        self.marquee
    }

    fn press(&mut self, position: Vec2, additive: bool, ctx: &mut ToolContext) {
        if !additive && self.selection.clear(ctx.scene) {
            ctx.notifier.selection_changed(&[]);
        }
        self.press = Some(Press {
            start: position,
            additive,
        });
        self.state = ToolState::Dragging;
    }

    fn is_drag(&self, press: &Press, position: Vec2, ctx: &ToolContext) -> bool {
        press.start.distance(position) >= ctx.config.input.drag_threshold_px
    }

    fn drag(&mut self, position: Vec2, ctx: &mut ToolContext) {
        let Some(press) = self.press else {
            return;
        };
        if !self.is_drag(&press, position, ctx) {
            return;
        }
        let a = ctx.viewport.to_ndc(press.start);
        let b = ctx.viewport.to_ndc(position);
        let kind = OverlayKind::Marquee {
            min: a.min(b),
            max: a.max(b),
        };
        match self.marquee {
            Some(id) => {
                ctx.scene.update_overlay(id, kind);
            }
            None => self.marquee = Some(ctx.scene.add_overlay(kind)),
        }
    }

    fn release(&mut self, position: Vec2, ctx: &mut ToolContext) {
        self.state = ToolState::Idle;
        self.remove_marquee(ctx);
        let Some(press) = self.press.take() else {
            return;
        };

        // a plain press already cleared, so both paths add on top
        let changed = if self.is_drag(&press, position, ctx) {
            let a = ctx.viewport.to_ndc(press.start);
            let b = ctx.viewport.to_ndc(position);
            self.selection
                .select_in_marquee(ctx.scene, ctx.camera, a, b, true)
        } else {
            match ctx.pointer_ray(position) {
                Some(ray) => self.selection.click(ctx.scene, &ray, true),
                None => false,
            }
        };
        if changed {
            ctx.notifier
                .selection_changed(&self.selection.selected_objects());
        }
        tracing::debug!(
            "Selection {}: {} objects",
            if press.additive { "extended" } else { "set" },
            self.selection.len()
        );
    }

    fn remove_marquee(&mut self, ctx: &mut ToolContext) {
        if let Some(id) = self.marquee.take() {
            ctx.scene.remove_overlay(id);
        }
    }
}

impl ToolController for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
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
        tracing::debug!("Select tool enabled");
    }

    fn disable(&mut self, ctx: &mut ToolContext) {
        if !self.enabled {
            return;
        }
        self.remove_marquee(ctx);
        self.press = None;
        self.state = ToolState::Idle;
        if self.selection.clear(ctx.scene) {
            ctx.notifier.selection_changed(&[]);
        }
        self.guard.release(ctx.controls);
        self.enabled = false;
        tracing::debug!("Select tool disabled");
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolContext) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                position,
                modifiers,
                ..
            } if self.state == ToolState::Idle => {
                self.press(position, modifiers.shift, ctx);
                true
            }
            InputEvent::PointerMove { position, .. } if self.state == ToolState::Dragging => {
                self.drag(position, ctx);
                true
            }
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                position,
                ..
            } if self.state == ToolState::Dragging => {
                self.release(position, ctx);
                true
            }
            InputEvent::KeyDown {
                key: Key::Escape, ..
            } => {
                self.remove_marquee(ctx);
                self.press = None;
                self.state = ToolState::Idle;
                true
            }
            _ => false,
        }
    }

    fn on_scene_changed(&mut self, ctx: &mut ToolContext) {
        if self.selection.retain_present(ctx.scene) {
            ctx.notifier
                .selection_changed(&self.selection.selected_objects());
        }
        self.selection.refresh_highlights(ctx.scene);
    }

    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection.selected_objects()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::tools::test_support::Harness;
    use forma_cad::{PlaneBasis, SolidAssembler};
    use forma_scene::{SceneObject, ShapeStyle};
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn insert_box(h: &mut Harness, x: f32) -> ObjectId {
        let shape = SolidAssembler::default()
            .assemble_rectangle(
                Vec3::new(x - 0.5, 0.0, -0.5),
                Vec3::new(x + 0.5, 0.0, 0.5),
                &PlaneBasis::horizontal(Vec3::ZERO),
                Some(1.0),
            )
            .unwrap();
        h.scene
            .insert(SceneObject::from_assembled(shape, &ShapeStyle::default()))
            .unwrap()
    }

    fn pixel_of(h: &Harness, world: Vec3) -> Vec2 {
        let ndc = h.camera.project(world).unwrap();
        h.viewport.to_pixel(ndc.truncate())
    }

    fn shift_click(position: Vec2, time: u64) -> [InputEvent; 2] {
        [
            InputEvent::PointerDown {
                button: PointerButton::Primary,
                position,
                modifiers: Modifiers::SHIFT,
                time,
            },
            InputEvent::PointerUp {
                button: PointerButton::Primary,
                position,
                modifiers: Modifiers::SHIFT,
                time: time + 10,
            },
        ]
    }

    fn click(tool: &mut SelectTool, h: &mut Harness, position: Vec2, time: u64) {
        tool.handle_event(&InputEvent::click(position, time), &mut h.ctx());
        tool.handle_event(&InputEvent::release(position, time + 10), &mut h.ctx());
    }

    #[test]
    fn test_click_and_shift_click() {
        let mut h = Harness::new();
        let a = insert_box(&mut h, -1.5);
        let b = insert_box(&mut h, 1.5);
        let notified = Rc::new(RefCell::new(Vec::new()));
        let sink = notified.clone();
        h.notifier
            .set_selection_changed(Box::new(move |ids| sink.borrow_mut().push(ids.to_vec())));

        let mut tool = SelectTool::new();
        tool.enable(&mut h.ctx());
        let pa = pixel_of(&h, Vec3::new(-1.5, 1.0, 0.0));
        let pb = pixel_of(&h, Vec3::new(1.5, 1.0, 0.0));

        click(&mut tool, &mut h, pa, 0);
        assert_eq!(tool.selected_objects(), vec![a]);

        for event in shift_click(pb, 100) {
            tool.handle_event(&event, &mut h.ctx());
        }
        assert_eq!(tool.selected_objects(), vec![a, b]);
        assert_eq!(h.scene.overlay_count(), 2);

        // shift-click on a selected object removes it
        for event in shift_click(pa, 200) {
            tool.handle_event(&event, &mut h.ctx());
        }
        assert_eq!(tool.selected_objects(), vec![b]);
        assert_eq!(notified.borrow().last(), Some(&vec![b]));
    }

    #[test]
    fn test_click_on_empty_space_clears() {
        let mut h = Harness::new();
        insert_box(&mut h, 0.0);
        let mut tool = SelectTool::new();
        tool.enable(&mut h.ctx());

        let p = pixel_of(&h, Vec3::new(0.0, 1.0, 0.0));
        click(&mut tool, &mut h, p, 0);
        assert_eq!(tool.selected_objects().len(), 1);

        // shift on empty space keeps the selection
        for event in shift_click(Vec2::new(2.0, 2.0), 100) {
            tool.handle_event(&event, &mut h.ctx());
        }
        assert_eq!(tool.selected_objects().len(), 1);

        click(&mut tool, &mut h, Vec2::new(2.0, 2.0), 200);
        assert!(tool.selected_objects().is_empty());
        assert_eq!(h.scene.overlay_count(), 0);
    }

    #[test]
    fn test_marquee_drag_selects_inside() {
        let mut h = Harness::new();
        let a = insert_box(&mut h, -1.5);
        let b = insert_box(&mut h, 1.5);
        let mut tool = SelectTool::new();
        tool.enable(&mut h.ctx());

        tool.handle_event(&InputEvent::click(Vec2::new(1.0, 1.0), 0), &mut h.ctx());
        tool.handle_event(&InputEvent::pointer_move(Vec2::new(50.0, 99.0), 10), &mut h.ctx());
        assert!(tool.marquee().is_some());
        tool.handle_event(&InputEvent::release(Vec2::new(50.0, 99.0), 20), &mut h.ctx());

        assert!(tool.marquee().is_none());
        let selected = tool.selected_objects();
        assert!(selected.contains(&a));
        assert!(!selected.contains(&b));
        assert_eq!(h.scene.overlay_count(), 1);
    }

    #[test]
    fn test_escape_drops_marquee_keeps_selection() {
        let mut h = Harness::new();
        insert_box(&mut h, 0.0);
        let mut tool = SelectTool::new();
        tool.enable(&mut h.ctx());
        let p = pixel_of(&h, Vec3::new(0.0, 1.0, 0.0));
        click(&mut tool, &mut h, p, 0);

        let [press, _] = shift_click(Vec2::new(1.0, 1.0), 100);
        tool.handle_event(&press, &mut h.ctx());
        tool.handle_event(&InputEvent::pointer_move(Vec2::new(60.0, 60.0), 110), &mut h.ctx());
        assert!(tool.marquee().is_some());
        tool.handle_event(&InputEvent::key(Key::Escape, 120), &mut h.ctx());

        assert!(tool.marquee().is_none());
        assert_eq!(tool.state(), ToolState::Idle);
        assert_eq!(tool.selected_objects().len(), 1);
    }

    #[test]
    fn test_disable_clears_selection() {
        let mut h = Harness::new();
        insert_box(&mut h, 0.0);
        let mut tool = SelectTool::new();
        tool.enable(&mut h.ctx());
        let p = pixel_of(&h, Vec3::new(0.0, 1.0, 0.0));
        click(&mut tool, &mut h, p, 0);
        tool.disable(&mut h.ctx());
        assert!(tool.selected_objects().is_empty());
        assert_eq!(h.scene.overlay_count(), 0);
        assert!(h.controls.enabled);
    }

    #[test]
    fn test_removed_object_leaves_selection() {
        let mut h = Harness::new();
        let a = insert_box(&mut h, 0.0);
        let mut tool = SelectTool::new();
        tool.enable(&mut h.ctx());
        let p = pixel_of(&h, Vec3::new(0.0, 1.0, 0.0));
        click(&mut tool, &mut h, p, 0);

        h.scene.remove(a);
        tool.on_scene_changed(&mut h.ctx());
        assert!(tool.selected_objects().is_empty());
        assert_eq!(h.scene.overlay_count(), 0);
    }
}
