//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The editor
//! applies them; hosts only forward `KeyboardEvent.key` and modifier state.
//!
//! - ⌘/Ctrl are interchangeable
//! - Arrow keys nudge the selection, Shift for a larger step
//! - Space held = temporary pan mode
//! - Escape cancels a gesture in flight, otherwise deselects

/// Direction of an arrow-key nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl NudgeDirection {
    /// Unit vector in world space (y grows downward).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Duplicate,
    Nudge { direction: NudgeDirection, large: bool },

    // ── View ──
    ZoomIn,
    ZoomOut,
    /// Fit every element on screen.
    ZoomToFit,
    /// Fit the selection on screen.
    ZoomToSelection,
    /// Back to 100% at the origin.
    ZoomReset,
    PanStart,

    // ── UI ──
    Deselect,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, _alt: bool, meta: bool) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if !cmd {
            let direction = match key {
                "ArrowUp" => Some(NudgeDirection::Up),
                "ArrowDown" => Some(NudgeDirection::Down),
                "ArrowLeft" => Some(NudgeDirection::Left),
                "ArrowRight" => Some(NudgeDirection::Right),
                _ => None,
            };
            if let Some(direction) = direction {
                return Some(ShortcutAction::Nudge {
                    direction,
                    large: shift,
                });
            }
        }

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                _ => None,
            };
        }

        if shift {
            return match key {
                "1" | "!" => Some(ShortcutAction::ZoomToFit),
                "2" | "@" => Some(ShortcutAction::ZoomToSelection),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            " " => Some(ShortcutAction::PanStart),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(ShortcutAction::Undo)
        );
        // Ctrl+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        // Cmd+Shift+Z → Redo
        assert_eq!(
            ShortcutMap::resolve("Z", false, true, false, true),
            Some(ShortcutAction::Redo)
        );
        // Ctrl+Y → Redo
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
    }

    #[test]
    fn resolve_selection_edits() {
        assert_eq!(
            ShortcutMap::resolve("a", false, false, false, true),
            Some(ShortcutAction::SelectAll)
        );
        assert_eq!(
            ShortcutMap::resolve("d", true, false, false, false),
            Some(ShortcutAction::Duplicate)
        );
    }

    #[test]
    fn resolve_nudge() {
        assert_eq!(
            ShortcutMap::resolve("ArrowLeft", false, false, false, false),
            Some(ShortcutAction::Nudge {
                direction: NudgeDirection::Left,
                large: false
            })
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowDown", false, true, false, false),
            Some(ShortcutAction::Nudge {
                direction: NudgeDirection::Down,
                large: true
            })
        );
        // Cmd+Arrow is left to the host.
        assert_eq!(ShortcutMap::resolve("ArrowUp", false, false, false, true), None);
    }

    #[test]
    fn resolve_zoom() {
        assert_eq!(
            ShortcutMap::resolve("=", false, false, false, true),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("-", false, false, false, true),
            Some(ShortcutAction::ZoomOut)
        );
        assert_eq!(
            ShortcutMap::resolve("0", false, false, false, true),
            Some(ShortcutAction::ZoomReset)
        );
        assert_eq!(
            ShortcutMap::resolve("!", false, true, false, false),
            Some(ShortcutAction::ZoomToFit)
        );
        assert_eq!(
            ShortcutMap::resolve("2", false, true, false, false),
            Some(ShortcutAction::ZoomToSelection)
        );
    }

    #[test]
    fn resolve_escape_and_space() {
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Deselect)
        );
        assert_eq!(
            ShortcutMap::resolve(" ", false, false, false, false),
            Some(ShortcutAction::PanStart)
        );
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("z", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("7", false, true, false, false), None);
    }

    #[test]
    fn nudge_units() {
        assert_eq!(NudgeDirection::Up.unit(), (0.0, -1.0));
        assert_eq!(NudgeDirection::Right.unit(), (1.0, 0.0));
    }
}
