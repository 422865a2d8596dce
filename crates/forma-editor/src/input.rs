//! Input events delivered to the editor

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Event time in milliseconds
pub type Timestamp = u64;

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerButton {
    /// Button 0
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Keyboard modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd on macOS
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl or Cmd
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Char(char),
}

impl Key {
    /// Nudge direction of an arrow key (+1 for up/right, -1 for down/left)
    pub fn nudge_direction(&self) -> Option<f32> {
        match self {
            Key::ArrowUp | Key::ArrowRight => Some(1.0),
            Key::ArrowDown | Key::ArrowLeft => Some(-1.0),
            _ => None,
        }
    }

    /// Check if this is the given letter, ignoring case
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// An input event. Pointer positions are in viewport pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        button: PointerButton,
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
        time: Timestamp,
    },
    PointerMove {
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
        time: Timestamp,
    },
    PointerUp {
        button: PointerButton,
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
        time: Timestamp,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
        time: Timestamp,
    },
    /// Viewport resized
    Resize { width: f32, height: f32 },
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerDown { .. } => EventKind::PointerDown,
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::PointerUp { .. } => EventKind::PointerUp,
            InputEvent::KeyDown { .. } => EventKind::KeyDown,
            InputEvent::Resize { .. } => EventKind::Resize,
        }
    }

    /// Event time, if the event carries one
    pub fn time(&self) -> Option<Timestamp> {
        match self {
            InputEvent::PointerDown { time, .. }
            | InputEvent::PointerMove { time, .. }
            | InputEvent::PointerUp { time, .. }
            | InputEvent::KeyDown { time, .. } => Some(*time),
            InputEvent::Resize { .. } => None,
        }
    }

    /// Primary-button press at `position` with no modifiers
    pub fn click(position: Vec2, time: Timestamp) -> Self {
        InputEvent::PointerDown {
            button: PointerButton::Primary,
            position,
            modifiers: Modifiers::NONE,
            time,
        }
    }

    pub fn release(position: Vec2, time: Timestamp) -> Self {
        InputEvent::PointerUp {
            button: PointerButton::Primary,
            position,
            modifiers: Modifiers::NONE,
            time,
        }
    }

    pub fn pointer_move(position: Vec2, time: Timestamp) -> Self {
        InputEvent::PointerMove {
            position,
            modifiers: Modifiers::NONE,
            time,
        }
    }

    pub fn key(key: Key, time: Timestamp) -> Self {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
            time,
        }
    }
}

/// Event categories tools subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    KeyDown,
    Resize,
}

impl EventKind {
    pub const POINTER: &'static [EventKind] = &[
        EventKind::PointerDown,
        EventKind::PointerMove,
        EventKind::PointerUp,
    ];

    pub const ALL_TOOL_EVENTS: &'static [EventKind] = &[
        EventKind::PointerDown,
        EventKind::PointerMove,
        EventKind::PointerUp,
        EventKind::KeyDown,
    ];
}
