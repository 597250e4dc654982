//! Input abstraction layer.
//!
//! Normalizes mouse, touch and pen events into a single `InputEvent` enum
//! consumed by the mode controller. All pointer coordinates are screen
//! space (CSS pixels relative to the canvas element).

use board_core::geometry::Point;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Self::NONE
    };

    /// Cmd on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button, single touch, pen contact.
    #[default]
    Primary,
    /// Middle mouse button. Always pans.
    Middle,
    Secondary,
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: Button,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        button: Button,
        modifiers: Modifiers,
    },
    /// Scroll wheel / trackpad. With Cmd/Ctrl held this zooms at the
    /// cursor, otherwise it pans.
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
    },
    KeyDown { key: String, modifiers: Modifiers },
    KeyUp { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: Button::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            button: Button::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Return a copy with different modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, mods: Modifiers) -> Self {
        match &mut self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. }
            | Self::Wheel { modifiers, .. }
            | Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. } => *modifiers = mods,
        }
        self
    }

    /// Screen position if this is a pointer or wheel event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some(Point::new(*x, *y)),
            Self::KeyDown { .. } | Self::KeyUp { .. } => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. }
            | Self::Wheel { modifiers, .. }
            | Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. } => *modifiers,
        }
    }
}
