//! Resize engine: handle geometry, per-type constraints, live sessions.
//!
//! A [`ResizeSession`] is opened when the pointer goes down on a handle. It
//! remembers the element's bounds at that moment and recomputes the whole
//! rectangle from those bounds plus the total pointer delta on every move,
//! so rounding never accumulates across frames.
//!
//! ## Constraint order
//!
//! 1. The dragged handle changes its own axis (or both, for corners).
//! 2. With an aspect lock, one axis *drives*: the handle's axis for edges,
//!    the axis with the larger relative change for corners.
//! 3. The driving axis is clamped to its minimum.
//! 4. The other axis is derived from the ratio (`ratio = width / height`).
//!    The derived axis is **not** clamped again. When the minimum and the
//!    ratio disagree, the ratio wins.
//! 5. The side opposite the dragged handle stays where it was.

use board_core::geometry::{Bounds, Point};
use board_core::id::ElementId;
use serde::{Deserialize, Serialize};

// ─── Edges & handles ─────────────────────────────────────────────────────

/// One side of an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const fn bit(self) -> u8 {
        match self {
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 4,
            Self::Left => 8,
        }
    }
}

/// Set of resizable edges. Serializes as its bitmask
/// (top = 1, right = 2, bottom = 4, left = 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeSet(u8);

impl EdgeSet {
    pub const NONE: EdgeSet = EdgeSet(0);
    pub const ALL: EdgeSet = EdgeSet(0b1111);
    pub const HORIZONTAL: EdgeSet = EdgeSet(Edge::Left.bit() | Edge::Right.bit());
    pub const VERTICAL: EdgeSet = EdgeSet(Edge::Top.bit() | Edge::Bottom.bit());

    pub fn of(edges: &[Edge]) -> Self {
        EdgeSet(edges.iter().fold(0, |acc, e| acc | e.bit()))
    }

    pub fn contains(self, edge: Edge) -> bool {
        self.0 & edge.bit() != 0
    }

    #[must_use]
    pub fn with(self, edge: Edge) -> Self {
        EdgeSet(self.0 | edge.bit())
    }
}

/// The eight handles drawn around a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// The edge a side handle sits on. `None` for corners.
    pub fn edge(self) -> Option<Edge> {
        match self {
            Self::N => Some(Edge::Top),
            Self::E => Some(Edge::Right),
            Self::S => Some(Edge::Bottom),
            Self::W => Some(Edge::Left),
            _ => None,
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    fn changes_width(self) -> bool {
        self.moves_left() || self.moves_right()
    }

    fn changes_height(self) -> bool {
        self.moves_top() || self.moves_bottom()
    }

    /// Where this handle is drawn for `b`.
    pub fn anchor_point(self, b: &Bounds) -> Point {
        let cx = b.x + b.width / 2.0;
        let cy = b.y + b.height / 2.0;
        match self {
            Self::N => Point::new(cx, b.top()),
            Self::Ne => Point::new(b.right(), b.top()),
            Self::E => Point::new(b.right(), cy),
            Self::Se => Point::new(b.right(), b.bottom()),
            Self::S => Point::new(cx, b.bottom()),
            Self::Sw => Point::new(b.left(), b.bottom()),
            Self::W => Point::new(b.left(), cy),
            Self::Nw => Point::new(b.left(), b.top()),
        }
    }
}

// ─── Per-type configuration ──────────────────────────────────────────────

/// Resize rules a block type declares when it registers. Plugin
/// manifests may carry it as JSON; missing keys take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub min_width: f64,
    pub min_height: f64,
    /// Side handles that are active. Corners are always active unless the
    /// height is content-driven.
    pub edges: EdgeSet,
    pub maintain_aspect_ratio: bool,
    /// Fixed `width / height`. When `None` and the ratio is maintained, the
    /// ratio at pointer-down is used.
    pub aspect_ratio: Option<f64>,
    /// Added above and below measured content for content-driven height.
    pub padding: f64,
    /// Height follows the content size signal; only left/right resize.
    pub content_height: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self::new(20.0, 20.0)
    }
}

impl ResizeConfig {
    pub fn new(min_width: f64, min_height: f64) -> Self {
        Self {
            min_width,
            min_height,
            edges: EdgeSet::ALL,
            maintain_aspect_ratio: false,
            aspect_ratio: None,
            padding: 0.0,
            content_height: false,
        }
    }

    #[must_use]
    pub fn with_edges(mut self, edges: EdgeSet) -> Self {
        self.edges = edges;
        self
    }

    /// Lock to a fixed `width / height` ratio.
    #[must_use]
    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.maintain_aspect_ratio = true;
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Lock to whatever ratio the element has when a resize starts.
    #[must_use]
    pub fn keep_aspect_ratio(mut self) -> Self {
        self.maintain_aspect_ratio = true;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Width-only resizing; height comes from measured content.
    #[must_use]
    pub fn content_driven_height(mut self) -> Self {
        self.edges = EdgeSet::HORIZONTAL;
        self.content_height = true;
        self
    }

    /// Whether the given handle can start a resize for this type.
    pub fn allows(&self, handle: ResizeHandle) -> bool {
        match handle.edge() {
            Some(edge) => self.edges.contains(edge),
            None => !self.content_height,
        }
    }

    /// Height for a given measured content height.
    pub fn height_for_content(&self, content_height: f64) -> f64 {
        (content_height + self.padding * 2.0).max(self.min_height)
    }

    /// Resolve the lock ratio for a resize starting from `initial`.
    fn lock_ratio(&self, initial: &Bounds, force: bool) -> Option<f64> {
        if !(self.maintain_aspect_ratio || force) || self.content_height {
            return None;
        }
        let ratio = match self.aspect_ratio {
            Some(r) => r,
            None if initial.height > 0.0 => initial.width / initial.height,
            None => return None,
        };
        (ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Compute new bounds for dragging `handle` by a world-space `(dx, dy)`
/// from `initial`.
///
/// `lock_aspect` forces an aspect lock at the initial ratio even when the
/// config does not ask for one (Shift on a corner). `content_height` is
/// the latest measured content height for content-driven types.
pub fn resize_bounds(
    initial: Bounds,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    config: &ResizeConfig,
    lock_aspect: bool,
    content_height: Option<f64>,
) -> Bounds {
    let mut w = initial.width;
    let mut h = initial.height;
    if handle.moves_right() {
        w = initial.width + dx;
    } else if handle.moves_left() {
        w = initial.width - dx;
    }
    if handle.moves_bottom() {
        h = initial.height + dy;
    } else if handle.moves_top() {
        h = initial.height - dy;
    }

    if config.content_height {
        w = w.max(config.min_width);
        h = content_height.map_or(initial.height, |c| config.height_for_content(c));
    } else if let Some(ratio) = config.lock_ratio(&initial, lock_aspect && handle.is_corner()) {
        let width_drives = match (handle.changes_width(), handle.changes_height()) {
            (true, false) => true,
            (false, true) => false,
            _ => {
                let rel_w = relative_change(w, initial.width);
                let rel_h = relative_change(h, initial.height);
                rel_w >= rel_h
            }
        };
        if width_drives {
            w = w.max(config.min_width);
            h = w / ratio;
        } else {
            h = h.max(config.min_height);
            w = h * ratio;
        }
    } else {
        w = w.max(config.min_width);
        h = h.max(config.min_height);
    }

    let x = if handle.moves_left() {
        initial.right() - w
    } else {
        initial.x
    };
    let y = if handle.moves_top() {
        initial.bottom() - h
    } else {
        initial.y
    };
    Bounds::new(x, y, w, h)
}

fn relative_change(now: f64, before: f64) -> f64 {
    if before.abs() < f64::EPSILON {
        (now - before).abs()
    } else {
        ((now - before) / before).abs()
    }
}

// ─── Session ─────────────────────────────────────────────────────────────

/// Live state of one resize gesture.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    pub id: ElementId,
    pub handle: ResizeHandle,
    pub config: ResizeConfig,
    /// World position of the pointer at pointer-down.
    pub start_world: Point,
    /// Element bounds at pointer-down.
    pub initial: Bounds,
    /// Bounds written by the latest move.
    pub current: Bounds,
}

impl ResizeSession {
    pub fn begin(
        id: ElementId,
        handle: ResizeHandle,
        config: ResizeConfig,
        start_world: Point,
        initial: Bounds,
    ) -> Self {
        log::debug!("resize start {id} via {handle:?}");
        Self {
            id,
            handle,
            config,
            start_world,
            initial,
            current: initial,
        }
    }

    /// Recompute bounds for the pointer at `world`. The caller writes the
    /// result into the store for live feedback.
    pub fn update(&mut self, world: Point, lock_aspect: bool, content_height: Option<f64>) -> Bounds {
        self.current = resize_bounds(
            self.initial,
            self.handle,
            world.x - self.start_world.x,
            world.y - self.start_world.y,
            &self.config,
            lock_aspect,
            content_height,
        );
        self.current
    }

    pub fn changed(&self) -> bool {
        self.current != self.initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_bounds(actual: Bounds, expected: Bounds) {
        assert!(
            (actual.x - expected.x).abs() < EPS
                && (actual.y - expected.y).abs() < EPS
                && (actual.width - expected.width).abs() < EPS
                && (actual.height - expected.height).abs() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn east_edge_grows_width_only() {
        let start = Bounds::new(10.0, 10.0, 100.0, 50.0);
        let out = resize_bounds(start, ResizeHandle::E, 30.0, 99.0, &ResizeConfig::default(), false, None);
        assert_bounds(out, Bounds::new(10.0, 10.0, 130.0, 50.0));
    }

    #[test]
    fn west_edge_keeps_right_side_anchored() {
        let start = Bounds::new(10.0, 10.0, 100.0, 50.0);
        let out = resize_bounds(start, ResizeHandle::W, 20.0, 0.0, &ResizeConfig::default(), false, None);
        assert_bounds(out, Bounds::new(30.0, 10.0, 80.0, 50.0));
        assert!((out.right() - start.right()).abs() < EPS);
    }

    #[test]
    fn north_west_corner_anchors_south_east() {
        let start = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let out = resize_bounds(start, ResizeHandle::Nw, -10.0, 20.0, &ResizeConfig::default(), false, None);
        assert_bounds(out, Bounds::new(-10.0, 20.0, 110.0, 80.0));
    }

    #[test]
    fn minimum_clamps_and_anchor_holds() {
        let config = ResizeConfig::new(40.0, 30.0);
        let start = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let out = resize_bounds(start, ResizeHandle::Nw, 500.0, 500.0, &config, false, None);
        assert_bounds(out, Bounds::new(60.0, 70.0, 40.0, 30.0));
    }

    #[test]
    fn aspect_ratio_wins_over_min_height() {
        // minWidth=50, minHeight=50, ratio=2: width dragged to 10 clamps to
        // 50, height follows the ratio to 25 even though that is below
        // minHeight.
        let config = ResizeConfig::new(50.0, 50.0).with_aspect_ratio(2.0);
        let start = Bounds::new(0.0, 0.0, 200.0, 100.0);
        let out = resize_bounds(start, ResizeHandle::E, -190.0, 0.0, &config, false, None);
        assert_bounds(out, Bounds::new(0.0, 0.0, 50.0, 25.0));
    }

    #[test]
    fn height_edge_with_lock_derives_width() {
        let config = ResizeConfig::new(10.0, 10.0).with_aspect_ratio(2.0);
        let start = Bounds::new(0.0, 0.0, 200.0, 100.0);
        let out = resize_bounds(start, ResizeHandle::S, 0.0, 50.0, &config, false, None);
        assert_bounds(out, Bounds::new(0.0, 0.0, 300.0, 150.0));
    }

    #[test]
    fn corner_with_lock_follows_dominant_axis() {
        let config = ResizeConfig::new(10.0, 10.0).keep_aspect_ratio();
        let start = Bounds::new(0.0, 0.0, 100.0, 50.0);
        // Width +50% vs height +10%: width drives.
        let out = resize_bounds(start, ResizeHandle::Se, 50.0, 5.0, &config, false, None);
        assert_bounds(out, Bounds::new(0.0, 0.0, 150.0, 75.0));
        // Height +100% vs width +10%: height drives.
        let out = resize_bounds(start, ResizeHandle::Se, 10.0, 50.0, &config, false, None);
        assert_bounds(out, Bounds::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn shift_locks_corners_only() {
        let config = ResizeConfig::new(10.0, 10.0);
        let start = Bounds::new(0.0, 0.0, 100.0, 50.0);
        let corner = resize_bounds(start, ResizeHandle::Se, 100.0, 0.0, &config, true, None);
        assert_bounds(corner, Bounds::new(0.0, 0.0, 200.0, 100.0));
        let edge = resize_bounds(start, ResizeHandle::E, 100.0, 0.0, &config, true, None);
        assert_bounds(edge, Bounds::new(0.0, 0.0, 200.0, 50.0));
    }

    #[test]
    fn content_driven_height_ignores_gesture_height() {
        let config = ResizeConfig::new(80.0, 20.0).content_driven_height().with_padding(8.0);
        assert!(config.allows(ResizeHandle::E));
        assert!(config.allows(ResizeHandle::W));
        assert!(!config.allows(ResizeHandle::N));
        assert!(!config.allows(ResizeHandle::Se));

        let start = Bounds::new(0.0, 0.0, 200.0, 60.0);
        let out = resize_bounds(start, ResizeHandle::E, -50.0, 300.0, &config, false, Some(120.0));
        assert_bounds(out, Bounds::new(0.0, 0.0, 150.0, 136.0));
        let no_signal = resize_bounds(start, ResizeHandle::E, 10.0, 0.0, &config, false, None);
        assert_bounds(no_signal, Bounds::new(0.0, 0.0, 210.0, 60.0));
    }

    #[test]
    fn disabled_edges_are_rejected_but_corners_remain() {
        let config = ResizeConfig::default().with_edges(EdgeSet::of(&[Edge::Right]));
        assert!(config.allows(ResizeHandle::E));
        assert!(!config.allows(ResizeHandle::W));
        assert!(config.allows(ResizeHandle::Nw));
    }

    #[test]
    fn config_from_manifest_json() {
        let config: ResizeConfig =
            serde_json::from_str(r#"{ "min_width": 64, "edges": 10, "maintain_aspect_ratio": true }"#).unwrap();
        assert_eq!(config.min_width, 64.0);
        assert_eq!(config.min_height, 20.0);
        assert_eq!(config.edges, EdgeSet::HORIZONTAL);
        assert!(config.maintain_aspect_ratio);
        assert_eq!(config.aspect_ratio, None);
    }

    #[test]
    fn session_recomputes_from_initial() {
        let id = ElementId::intern("rs");
        let mut s = ResizeSession::begin(
            id,
            ResizeHandle::Se,
            ResizeConfig::default(),
            Point::new(100.0, 100.0),
            Bounds::new(0.0, 0.0, 100.0, 100.0),
        );
        s.update(Point::new(150.0, 120.0), false, None);
        let out = s.update(Point::new(110.0, 110.0), false, None);
        assert_bounds(out, Bounds::new(0.0, 0.0, 110.0, 110.0));
        assert!(s.changed());
    }
}
