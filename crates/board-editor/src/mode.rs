//! Mode controller: which handler family owns the pointer, and what the
//! current gesture is.
//!
//! There is one base [`Mode`] chosen by the host (select or pan) plus two
//! temporary overrides: holding Space, or pressing the middle button, pans
//! from select mode and drops back when released. At most one [`Gesture`]
//! is in flight; a pointer-down while another gesture runs is ignored.

use crate::drag::DragSession;
use crate::input::Button;
use crate::resize::ResizeSession;
use crate::selection::SelectionArea;
use board_core::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Select,
    Pan,
}

/// One pointer interaction from press to release.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    BoxSelecting(SelectionArea),
    Dragging(DragSession),
    Resizing(ResizeSession),
    /// `last` is the previous pointer position in screen space.
    Panning { last: Point },
}

/// Payload-free view of [`Gesture`] for callers that only need the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Idle,
    BoxSelecting,
    Dragging,
    Resizing,
    Panning,
}

impl Gesture {
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Idle => GestureKind::Idle,
            Self::BoxSelecting(_) => GestureKind::BoxSelecting,
            Self::Dragging(_) => GestureKind::Dragging,
            Self::Resizing(_) => GestureKind::Resizing,
            Self::Panning { .. } => GestureKind::Panning,
        }
    }
}

/// Where a pointer-down should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRoute {
    Select,
    Pan,
    /// Not ours (secondary button, or a gesture is already running).
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: Mode,
    space_held: bool,
    gesture: Gesture,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The host-selected base mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::debug!("mode {:?} -> {mode:?}", self.mode);
            self.mode = mode;
        }
    }

    /// Mode after the Space override.
    pub fn effective_mode(&self) -> Mode {
        if self.space_held { Mode::Pan } else { self.mode }
    }

    pub fn press_space(&mut self) {
        self.space_held = true;
    }

    pub fn release_space(&mut self) {
        self.space_held = false;
    }

    pub fn space_held(&self) -> bool {
        self.space_held
    }

    pub fn route_pointer_down(&self, button: Button) -> PointerRoute {
        if !matches!(self.gesture, Gesture::Idle) {
            return PointerRoute::Ignore;
        }
        match (button, self.effective_mode()) {
            (Button::Middle, _) | (Button::Primary, Mode::Pan) => PointerRoute::Pan,
            (Button::Primary, Mode::Select) => PointerRoute::Select,
            (Button::Secondary, _) => PointerRoute::Ignore,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn gesture_mut(&mut self) -> &mut Gesture {
        &mut self.gesture
    }

    pub fn gesture_kind(&self) -> GestureKind {
        self.gesture.kind()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn begin(&mut self, gesture: Gesture) {
        log::trace!("gesture {:?}", gesture.kind());
        self.gesture = gesture;
    }

    /// End the current gesture, handing its state to the caller.
    pub fn take_gesture(&mut self) -> Gesture {
        std::mem::take(&mut self.gesture)
    }
}
