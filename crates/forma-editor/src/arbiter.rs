//! Tool arbiter
//!
//! Owns one controller per tool kind and the single active slot. Switching
//! tools always disables every other controller before the new one is
//! enabled.

use forma_scene::ObjectId;
use glam::Vec3;

use crate::input::{InputEvent, Timestamp};
use crate::router::InputRouter;
use crate::tools::{ToolContext, ToolController, ToolKind, create_tool};

/// Registry of tool controllers with one active slot.
pub struct ToolArbiter {
    tools: Vec<Box<dyn ToolController>>,
    active: Option<ToolKind>,
    router: InputRouter,
}

impl ToolArbiter {
    /// Creates an arbiter holding the built-in controller for every tool kind.
    pub fn new() -> Self {
        let mut arbiter = Self::empty();
        for kind in ToolKind::all() {
            arbiter.tools.push(create_tool(*kind));
        }
        arbiter
    }

    /// Creates an arbiter with no controllers.
    pub fn empty() -> Self {
        Self {
            tools: Vec::new(),
            active: None,
            router: InputRouter::new(),
        }
    }

    /// Registers a controller, replacing any controller of the same kind.
    ///
    /// The replaced controller is returned; it must not be enabled, so the
    /// active tool is deactivated first if it is being replaced.
    pub fn register(
        &mut self,
        tool: Box<dyn ToolController>,
        ctx: &mut ToolContext,
    ) -> Option<Box<dyn ToolController>> {
        let kind = tool.kind();
        if self.active == Some(kind) {
            self.deactivate(ctx);
        }
        let replaced = self
            .tools
            .iter()
            .position(|t| t.kind() == kind)
            .map(|pos| self.tools.remove(pos));
        self.tools.push(tool);
        replaced
    }

    /// Gets a controller by kind.
    pub fn tool(&self, kind: ToolKind) -> Option<&dyn ToolController> {
        self.tools
            .iter()
            .find(|t| t.kind() == kind)
            .map(|t| t.as_ref())
    }

    fn tool_mut(&mut self, kind: ToolKind) -> Option<&mut Box<dyn ToolController>> {
        self.tools.iter_mut().find(|t| t.kind() == kind)
    }

    pub fn contains(&self, kind: ToolKind) -> bool {
        self.tools.iter().any(|t| t.kind() == kind)
    }

    /// Returns the number of registered controllers.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Kind of the active tool.
    pub fn active(&self) -> Option<ToolKind> {
        self.active
    }

    pub fn is_enabled(&self, kind: ToolKind) -> bool {
        self.tool(kind).is_some_and(|t| t.is_enabled())
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Make `kind` the active tool.
    ///
    /// Every other enabled controller is disabled and unsubscribed before the
    /// new one is enabled. Returns false if no controller of that kind is
    /// registered.
    pub fn activate(&mut self, kind: ToolKind, ctx: &mut ToolContext) -> bool {
        if !self.contains(kind) {
            tracing::warn!("No controller registered for {} tool", kind.name());
            return false;
        }

        for tool in self.tools.iter_mut().filter(|t| t.kind() != kind) {
            if tool.is_enabled() {
                tool.disable(ctx);
            }
            self.router.unregister(tool.kind());
        }

        let Some(tool) = self.tool_mut(kind) else {
            return false;
        };
        tool.enable(ctx);
        let subscriptions = tool.subscriptions();
        self.router.register(kind, subscriptions);
        self.active = Some(kind);
        tracing::info!("Activated {} tool", kind.name());
        true
    }

    /// Disable the active tool. Returns false if none was active.
    pub fn deactivate(&mut self, ctx: &mut ToolContext) -> bool {
        let Some(kind) = self.active.take() else {
            return false;
        };
        if let Some(tool) = self.tool_mut(kind) {
            tool.disable(ctx);
        }
        self.router.unregister(kind);
        tracing::info!("Deactivated {} tool", kind.name());
        true
    }

    /// Route an event to the tool subscribed to its kind. Returns true if
    /// the event was consumed.
    pub fn dispatch(&mut self, event: &InputEvent, ctx: &mut ToolContext) -> bool {
        let Some(kind) = self.router.listener(event.kind()) else {
            return false;
        };
        match self.tool_mut(kind) {
            Some(tool) if tool.is_enabled() => tool.handle_event(event, ctx),
            _ => false,
        }
    }

    /// Per-frame update of the active tool.
    pub fn update(&mut self, now: Timestamp, ctx: &mut ToolContext) {
        if let Some(tool) = self.active.and_then(|kind| self.tool_mut(kind)) {
            tool.update(now, ctx);
        }
    }

    /// Tell every enabled controller that objects were removed or restored.
    pub fn on_scene_changed(&mut self, ctx: &mut ToolContext) {
        for tool in self.tools.iter_mut().filter(|t| t.is_enabled()) {
            tool.on_scene_changed(ctx);
        }
    }

    /// Objects selected by the active tool.
    pub fn selected_objects(&self) -> Vec<ObjectId> {
        self.active
            .and_then(|kind| self.tool(kind))
            .map(|t| t.selected_objects())
            .unwrap_or_default()
    }

    pub fn set_height(&mut self, height: f32, ctx: &mut ToolContext) -> bool {
        match self.active.and_then(|kind| self.tool_mut(kind)) {
            Some(tool) => tool.set_height(height, ctx),
            None => false,
        }
    }

    pub fn set_scale(&mut self, scale: Vec3, ctx: &mut ToolContext) -> bool {
        match self.active.and_then(|kind| self.tool_mut(kind)) {
            Some(tool) => tool.set_scale(scale, ctx),
            None => false,
        }
    }
}

impl Default for ToolArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tools: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
        f.debug_struct("ToolArbiter")
            .field("tools", &tools)
            .field("active", &self.active)
            .field("router", &self.router)
            .finish()
    }
}
