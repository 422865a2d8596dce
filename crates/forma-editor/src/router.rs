//! Input routing table
//!
//! Records which tool listens to which event kind. A tool registers when it
//! is enabled and is fully unregistered when it is disabled, so a disabled
//! tool never receives events.

use std::collections::HashMap;

use crate::input::EventKind;
use crate::tools::ToolKind;

/// Event kind to listening tool
#[derive(Debug, Default)]
pub struct InputRouter {
    listeners: HashMap<EventKind, ToolKind>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a tool to event kinds.
    ///
    /// Any earlier registration of the tool is dropped first. A kind already
    /// claimed by another tool is taken over.
    pub fn register(&mut self, tool: ToolKind, kinds: &[EventKind]) {
        self.unregister(tool);
        for kind in kinds {
            if let Some(previous) = self.listeners.insert(*kind, tool) {
                tracing::warn!(
                    "{:?} events taken from {} by {}",
                    kind,
                    previous.name(),
                    tool.name()
                );
            }
        }
    }

    /// Drop every subscription of a tool. Returns true if it had any.
    pub fn unregister(&mut self, tool: ToolKind) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|_, listener| *listener != tool);
        self.listeners.len() != before
    }

    /// Tool receiving events of a kind.
    pub fn listener(&self, kind: EventKind) -> Option<ToolKind> {
        self.listeners.get(&kind).copied()
    }

    pub fn is_registered(&self, tool: ToolKind) -> bool {
        self.listeners.values().any(|listener| *listener == tool)
    }

    /// Number of routed event kinds.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
