//! Single/double click disambiguation
//!
//! A click arms a pending handle. A second click inside the window cancels it
//! and the pair counts as a double-click; otherwise the handle expires and the
//! click counts as a single point placement. Expiry is observed either by the
//! next click or by polling from the per-frame update.

use glam::Vec2;

use crate::input::Timestamp;

/// A click waiting for the double-click window to close
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingClick {
    /// Pointer position in pixels
    pub position: Vec2,
    pub time: Timestamp,
    /// The click was already acted on when it arrived
    pub placed: bool,
}

/// Result of registering a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickResolution {
    /// The click is now pending. `expired` is the previous pending click
    /// whose window had closed, still to be placed if it was not already.
    Single { expired: Option<PendingClick> },
    /// The click completed a double-click; the cancelled first click
    /// is returned.
    Double { first: PendingClick },
}

/// Cancellable delayed-click handle
#[derive(Debug, Clone)]
pub struct ClickTimer {
    window_ms: u64,
    pending: Option<PendingClick>,
}

impl ClickTimer {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            pending: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingClick> {
        self.pending.as_ref()
    }

    /// Register a click that still needs placing once its window closes.
    pub fn register(&mut self, position: Vec2, time: Timestamp) -> ClickResolution {
        self.register_click(position, time, false)
    }

    /// Register a click that was acted on immediately. It can still be the
    /// first half of a double-click.
    pub fn register_placed(&mut self, position: Vec2, time: Timestamp) -> ClickResolution {
        self.register_click(position, time, true)
    }

    fn register_click(&mut self, position: Vec2, time: Timestamp, placed: bool) -> ClickResolution {
        if let Some(first) = self.pending
            && time.saturating_sub(first.time) <= self.window_ms
        {
            self.pending = None;
            return ClickResolution::Double { first };
        }

        let expired = self.pending.replace(PendingClick {
            position,
            time,
            placed,
        });
        ClickResolution::Single { expired }
    }

    /// Take the pending click if its window has closed by `now`.
    pub fn poll(&mut self, now: Timestamp) -> Option<PendingClick> {
        match self.pending {
            Some(pending) if now.saturating_sub(pending.time) > self.window_ms => {
                self.pending = None;
                Some(pending)
            }
            _ => None,
        }
    }

    /// Drop the pending click without placing it.
    pub fn cancel(&mut self) -> Option<PendingClick> {
        self.pending.take()
    }
}

impl Default for ClickTimer {
    fn default() -> Self {
        Self::new(250)
    }
}
