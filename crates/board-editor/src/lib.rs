//! Interaction engine for the infinite canvas.
//!
//! | Module | Role |
//! |--------|------|
//! | [`input`] | Normalized pointer, wheel and key events |
//! | [`hit`] | Point, rectangle and resize-handle hit testing |
//! | [`selection`] | Selection set and drag-to-select box |
//! | [`drag`] | Live multi-element moves and keyboard nudges |
//! | [`resize`] | Handle geometry, per-type constraints, resize sessions |
//! | [`commands`] | Reversible commands and the undo/redo stack |
//! | [`registry`] | Block type registry |
//! | [`actions`] | Per-type contextual actions |
//! | [`cull`] | Visible-set culling for large boards |
//! | [`mode`] | Select/pan modes and the gesture state machine |
//! | [`shortcuts`] | Keyboard shortcut resolution |
//! | [`editor`] | `CanvasEditor`, the facade hosts talk to |

pub mod actions;
pub mod commands;
pub mod cull;
pub mod drag;
pub mod editor;
pub mod hit;
pub mod input;
pub mod mode;
pub mod registry;
pub mod resize;
pub mod selection;
pub mod shortcuts;

pub use actions::{ActionContext, ActionDescriptor, ActionRegistry, ResolvedAction};
pub use commands::{Command, CommandStack, ElementMove};
pub use cull::ViewportCuller;
pub use editor::{CanvasEditor, EditorError, FrameReport, Registries, RenderItem};
pub use input::{Button, InputEvent, Modifiers};
pub use mode::{GestureKind, Mode, ModeController};
pub use registry::{BlockDescriptor, BlockRenderer, BlockTypeRegistry, RegistryError};
pub use resize::{Edge, EdgeSet, ResizeConfig, ResizeHandle};
pub use selection::{SelectionArea, SelectionBox, SelectionSet};
pub use shortcuts::{ShortcutAction, ShortcutMap};

pub use board_core;
