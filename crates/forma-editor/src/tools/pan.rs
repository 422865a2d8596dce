//! Pan tool: drag to move the camera

use glam::Vec2;

use super::{NavigationGuard, ToolContext, ToolController, ToolKind, ToolState};
use crate::input::{EventKind, InputEvent, PointerButton};

/// Camera pan tool. Keeps navigation enabled while active.
#[derive(Debug, Default)]
pub struct PanTool {
    enabled: bool,
    state: ToolState,
    last: Option<Vec2>,
    guard: NavigationGuard,
}

impl PanTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToolController for PanTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Pan
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn state(&self) -> ToolState {
        self.state
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        EventKind::POINTER
    }

    fn enable(&mut self, ctx: &mut ToolContext) {
        if self.enabled {
            self.disable(ctx);
        }
        self.guard.acquire(ctx.controls, true);
        self.enabled = true;
        tracing::debug!("Pan tool enabled");
    }

    fn disable(&mut self, ctx: &mut ToolContext) {
        if !self.enabled {
            return;
        }
        self.last = None;
        self.state = ToolState::Idle;
        self.guard.release(ctx.controls);
        self.enabled = false;
        tracing::debug!("Pan tool disabled");
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolContext) -> bool {
        if !self.enabled {
            return false;
        }
        match *event {
            InputEvent::PointerDown {
                button: PointerButton::Primary | PointerButton::Middle,
                position,
                ..
            } => {
                self.last = Some(position);
                self.state = ToolState::Dragging;
                true
            }
            InputEvent::PointerMove { position, .. } => {
                let Some(last) = self.last else {
                    return false;
                };
                self.last = Some(position);
                ctx.controls.pan(ctx.camera, position - last, &ctx.viewport)
            }
            InputEvent::PointerUp { .. } if self.state == ToolState::Dragging => {
                self.last = None;
                self.state = ToolState::Idle;
                true
            }
            _ => false,
        }
    }
}
