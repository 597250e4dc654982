//! Shared numeric defaults for the canvas crates.
//!
//! [`crate::config::EditorConfig::default`] is built from these; code that
//! has a config at hand should read the config instead.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 5.0;

/// Multiplicative step for keyboard zoom in/out.
pub const ZOOM_STEP: f64 = 1.2;

/// Screen-space padding kept around content by "zoom to fit".
pub const FIT_PADDING_PX: f64 = 40.0;

// ── History ─────────────────────────────────────────────────────

/// Undo history depth.
pub const HISTORY_CAPACITY: usize = 50;

/// Consecutive move/resize commands on the same ids closer than this
/// collapse into one undo step.
pub const MERGE_WINDOW_MS: u64 = 100;

// ── Selection & hit-testing ─────────────────────────────────────

/// A box selection smaller than this on both axes is treated as a click.
pub const CLICK_THRESHOLD_PX: f64 = 5.0;

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Culling ─────────────────────────────────────────────────────

/// Below this many elements the culler returns everything.
pub const CULL_THRESHOLD: usize = 100;

/// Extra margin around the viewport, as a fraction of its size per side.
pub const CULL_BUFFER_RATIO: f64 = 0.5;

// ── Editing ─────────────────────────────────────────────────────

/// World-space offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Arrow-key nudge distance in world units.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with Shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;
