//! Pan/zoom viewport and screen ↔ world conversion.
//!
//! `world_to_screen(p) = p * zoom + offset` and
//! `screen_to_world(p) = (p - offset) / zoom`. Offsets are in screen pixels;
//! zoom is a scale factor (1.0 = 100%). The math here is presentation
//! agnostic: pushing the result to a canvas or DOM transform is the host's
//! job, once per animation frame.

use crate::consts::{ZOOM_MAX, ZOOM_MIN};
use crate::geometry::{Bounds, Point, Size};
use serde::{Deserialize, Serialize};

/// Serializable pan/zoom state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub offset: Point,
    pub zoom: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            offset: Point::ORIGIN,
            zoom: 1.0,
        }
    }
}

/// Owns the viewport state and keeps zoom inside `[zoom_min, zoom_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    state: ViewportState,
    zoom_min: f64,
    zoom_max: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(ZOOM_MIN, ZOOM_MAX)
    }
}

impl ViewportTransform {
    /// A non-positive or non-finite bound falls back to its default; a
    /// reversed range is swapped.
    #[must_use]
    pub fn new(zoom_min: f64, zoom_max: f64) -> Self {
        let usable = |z: f64| z.is_finite() && z > 0.0;
        let min = if usable(zoom_min) { zoom_min } else { ZOOM_MIN };
        let max = if usable(zoom_max) { zoom_max } else { ZOOM_MAX };
        let (zoom_min, zoom_max) = if min > max {
            log::warn!("zoom range {min}..{max} is reversed; swapping");
            (max, min)
        } else {
            (min, max)
        };
        Self {
            state: ViewportState {
                zoom: 1.0_f64.clamp(zoom_min, zoom_max),
                ..ViewportState::default()
            },
            zoom_min,
            zoom_max,
        }
    }

    /// Restore a persisted state, clamping its zoom into range.
    #[must_use]
    pub fn with_state(mut self, state: ViewportState) -> Self {
        self.set_state(state);
        self
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn offset(&self) -> Point {
        self.state.offset
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.zoom_min, self.zoom_max)
    }

    // ─── Conversions ─────────────────────────────────────────────────────

    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.state.zoom + self.state.offset.x,
            y: world.y * self.state.zoom + self.state.offset.y,
        }
    }

    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.state.offset.x) / self.state.zoom,
            y: (screen.y - self.state.offset.y) / self.state.zoom,
        }
    }

    /// Convert a screen-space distance (pixels) to world units.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.state.zoom
    }

    #[must_use]
    pub fn world_bounds_to_screen(&self, b: Bounds) -> Bounds {
        let origin = self.world_to_screen(b.origin());
        Bounds::new(
            origin.x,
            origin.y,
            b.width * self.state.zoom,
            b.height * self.state.zoom,
        )
    }

    /// The world-space rectangle currently visible on a screen of `screen` size.
    #[must_use]
    pub fn visible_world_rect(&self, screen: Size) -> Bounds {
        Bounds::from_corners(
            self.screen_to_world(Point::ORIGIN),
            self.screen_to_world(Point::new(screen.width, screen.height)),
        )
    }

    // ─── Mutations ───────────────────────────────────────────────────────
    //
    // Each returns `true` when the state actually changed, so callers only
    // schedule a viewport-changed notification when there is something new.

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    pub fn set_state(&mut self, state: ViewportState) -> bool {
        let offset = if state.offset.is_finite() {
            state.offset
        } else {
            self.state.offset
        };
        let zoom = if state.zoom.is_finite() {
            self.clamp_zoom(state.zoom)
        } else {
            self.state.zoom
        };
        self.replace(ViewportState { offset, zoom })
    }

    /// Set zoom without moving the offset. Out-of-range values are clamped,
    /// non-finite ones ignored.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let zoom = self.clamp_zoom(zoom);
        self.replace(ViewportState {
            zoom,
            ..self.state
        })
    }

    /// Shift the view by a screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if !(dx.is_finite() && dy.is_finite()) {
            return false;
        }
        self.replace(ViewportState {
            offset: self.state.offset.offset(dx, dy),
            ..self.state
        })
    }

    /// Zoom to `zoom` while keeping the world point under `cursor` fixed.
    pub fn zoom_at(&mut self, cursor: Point, zoom: f64) -> bool {
        if !zoom.is_finite() || !cursor.is_finite() {
            return false;
        }
        let new_zoom = self.clamp_zoom(zoom);
        let old = self.state;
        let offset = Point {
            x: cursor.x - (cursor.x - old.offset.x) / old.zoom * new_zoom,
            y: cursor.y - (cursor.y - old.offset.y) / old.zoom * new_zoom,
        };
        self.replace(ViewportState {
            offset,
            zoom: new_zoom,
        })
    }

    /// Multiply the zoom by `factor` around `cursor`.
    pub fn zoom_by(&mut self, factor: f64, cursor: Point) -> bool {
        self.zoom_at(cursor, self.state.zoom * factor)
    }

    /// Center `bounds` on a screen of size `screen`, zooming so it fits
    /// inside `padding` pixels on every side.
    pub fn fit_bounds(&mut self, bounds: Bounds, screen: Size, padding: f64) -> bool {
        if !bounds.is_finite() || screen.width <= 0.0 || screen.height <= 0.0 {
            return false;
        }
        let avail_w = (screen.width - padding * 2.0).max(1.0);
        let avail_h = (screen.height - padding * 2.0).max(1.0);
        let zoom = match (bounds.width > 0.0, bounds.height > 0.0) {
            (true, true) => (avail_w / bounds.width).min(avail_h / bounds.height),
            (true, false) => avail_w / bounds.width,
            (false, true) => avail_h / bounds.height,
            (false, false) => self.state.zoom,
        };
        let zoom = self.clamp_zoom(zoom);
        let center = bounds.center();
        let offset = Point {
            x: screen.width / 2.0 - center.x * zoom,
            y: screen.height / 2.0 - center.y * zoom,
        };
        self.replace(ViewportState { offset, zoom })
    }

    /// Back to 100% (or the nearest allowed zoom) with the world origin at
    /// the top-left corner.
    pub fn reset(&mut self) -> bool {
        self.replace(ViewportState {
            zoom: self.clamp_zoom(1.0),
            ..ViewportState::default()
        })
    }

    fn replace(&mut self, next: ViewportState) -> bool {
        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn approx(a: Point, b: Point, eps: f64) -> bool {
        (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
    }

    #[test]
    fn roundtrip_across_states() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(123.456, -789.01),
            Point::new(-5000.5, 25000.25),
        ];
        let states = [
            (Point::new(0.0, 0.0), 1.0),
            (Point::new(350.0, -120.0), 0.1),
            (Point::new(-1e4, 3e3), 5.0),
            (Point::new(17.3, 99.9), 0.73),
        ];
        for (offset, zoom) in states {
            let vt = ViewportTransform::default().with_state(ViewportState { offset, zoom });
            for p in points {
                let back = vt.screen_to_world(vt.world_to_screen(p));
                assert!(approx(back, p, EPS), "{p:?} -> {back:?} at {offset:?}/{zoom}");
            }
        }
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vt = ViewportTransform::default();
        for requested in [0.0, -3.0, 0.01, 0.5, 4.9, 12.0, 1e9] {
            vt.set_zoom(requested);
            assert!((ZOOM_MIN..=ZOOM_MAX).contains(&vt.zoom()), "{requested}");
        }
        vt.set_zoom(100.0);
        assert_eq!(vt.zoom(), ZOOM_MAX);
        vt.set_zoom(0.0001);
        assert_eq!(vt.zoom(), ZOOM_MIN);
    }

    #[test]
    fn reversed_zoom_range_is_swapped() {
        let mut vt = ViewportTransform::new(5.0, 0.1);
        assert_eq!(vt.zoom_range(), (0.1, 5.0));
        vt.zoom_at(Point::new(10.0, 10.0), 100.0);
        assert_eq!(vt.zoom(), 5.0);
        vt.set_zoom(0.0);
        assert_eq!(vt.zoom(), 0.1);
    }

    #[test]
    fn unusable_zoom_bounds_fall_back() {
        let vt = ViewportTransform::new(f64::NAN, -1.0);
        assert_eq!(vt.zoom_range(), (ZOOM_MIN, ZOOM_MAX));
        let narrow = ViewportTransform::new(2.0, 3.0);
        assert_eq!(narrow.zoom(), 2.0, "initial zoom starts inside the range");
    }

    #[test]
    fn non_finite_zoom_ignored() {
        let mut vt = ViewportTransform::default();
        vt.set_zoom(2.0);
        assert!(!vt.set_zoom(f64::NAN));
        assert!(!vt.set_zoom(f64::INFINITY));
        assert_eq!(vt.zoom(), 2.0);
    }

    #[test]
    fn zoom_at_keeps_cursor_anchored() {
        let mut vt = ViewportTransform::default().with_state(ViewportState {
            offset: Point::new(40.0, -25.0),
            zoom: 1.3,
        });
        let cursor = Point::new(412.0, 233.0);
        for target in [0.2, 0.9, 2.5, 4.8, 50.0] {
            let world_before = vt.screen_to_world(cursor);
            vt.zoom_at(cursor, target);
            let screen_after = vt.world_to_screen(world_before);
            assert!(
                approx(screen_after, cursor, 1e-3),
                "anchor drifted to {screen_after:?} at zoom {target}"
            );
        }
    }

    #[test]
    fn pan_shifts_offset() {
        let mut vt = ViewportTransform::default();
        assert!(vt.pan(10.0, -5.0));
        assert_eq!(vt.offset(), Point::new(10.0, -5.0));
        assert!(!vt.pan(0.0, 0.0), "no-op pan reports unchanged");
    }

    #[test]
    fn visible_rect_follows_zoom() {
        let vt = ViewportTransform::default().with_state(ViewportState {
            offset: Point::new(-100.0, -50.0),
            zoom: 2.0,
        });
        let rect = vt.visible_world_rect(Size::new(800.0, 600.0));
        assert!((rect.x - 50.0).abs() < EPS);
        assert!((rect.y - 25.0).abs() < EPS);
        assert!((rect.width - 400.0).abs() < EPS);
        assert!((rect.height - 300.0).abs() < EPS);
    }

    #[test]
    fn fit_bounds_centers_content() {
        let mut vt = ViewportTransform::default();
        let content = Bounds::new(1000.0, 1000.0, 400.0, 200.0);
        let screen = Size::new(800.0, 600.0);
        vt.fit_bounds(content, screen, 0.0);
        assert!((vt.zoom() - 2.0).abs() < EPS);
        let center = vt.world_to_screen(content.center());
        assert!(approx(center, Point::new(400.0, 300.0), EPS));
    }
}
