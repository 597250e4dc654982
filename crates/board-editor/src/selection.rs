//! Selection set and drag-to-select box.
//!
//! The box lives in screen space while the gesture runs, so it follows the
//! pointer exactly at any zoom. Only on release are its corners converted
//! to world space and tested against elements.
//!
//! Pointer moves are coalesced: `update` only records the latest position,
//! and the box the renderer sees changes once per animation frame in
//! `flush_frame`.

use crate::hit::hit_test_rect;
use board_core::frame::FrameCoalescer;
use board_core::geometry::{Bounds, Point};
use board_core::id::ElementId;
use board_core::store::ElementStore;
use board_core::viewport::ViewportTransform;
use smallvec::SmallVec;

// ─── Selection set ───────────────────────────────────────────────────────

/// Ordered, duplicate-free list of selected ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<ElementId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn to_smallvec(&self) -> SmallVec<[ElementId; 4]> {
        self.ids.iter().copied().collect()
    }

    pub fn first(&self) -> Option<ElementId> {
        self.ids.first().copied()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Replace the whole selection. Returns whether anything changed.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let mut next: Vec<ElementId> = Vec::new();
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        if next == self.ids {
            return false;
        }
        self.ids = next;
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.ids.is_empty() {
            return false;
        }
        self.ids.clear();
        true
    }

    /// Append ids not already selected, keeping existing order.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = ElementId>) -> bool {
        let before = self.ids.len();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        self.ids.len() != before
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Drop ids no longer present in the store.
    pub fn prune<S: ElementStore + ?Sized>(&mut self, store: &S) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| store.contains(*id));
        self.ids.len() != before
    }
}

// ─── Selection box ───────────────────────────────────────────────────────

/// Screen-space rubber band, corners as the user dragged them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl SelectionBox {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    /// Normalized screen rectangle.
    pub fn rect(&self) -> Bounds {
        Bounds::from_corners(self.start(), self.end())
    }

    /// Both sides shorter than `threshold` pixels.
    pub fn is_click(&self, threshold: f64) -> bool {
        let r = self.rect();
        r.width < threshold && r.height < threshold
    }

    /// The box in world coordinates.
    pub fn world_rect(&self, viewport: &ViewportTransform) -> Bounds {
        Bounds::from_corners(
            viewport.screen_to_world(self.start()),
            viewport.screen_to_world(self.end()),
        )
    }
}

/// One box-select gesture.
#[derive(Debug, Clone)]
pub struct SelectionArea {
    current: SelectionBox,
    pending_end: FrameCoalescer<Point>,
    /// Selection at pointer-down, for additive (Shift) mode.
    base: Option<Vec<ElementId>>,
}

impl SelectionArea {
    /// Start at `screen`. Pass the prior selection to union with it
    /// (additive mode), or `None` to replace it.
    pub fn begin(screen: Point, additive_base: Option<Vec<ElementId>>) -> Self {
        Self {
            current: SelectionBox::new(screen, screen),
            pending_end: FrameCoalescer::new(),
            base: additive_base,
        }
    }

    pub fn is_additive(&self) -> bool {
        self.base.is_some()
    }

    /// Record the latest pointer position. Returns `true` when a frame
    /// callback should be requested.
    pub fn update(&mut self, screen: Point) -> bool {
        self.pending_end.schedule(screen)
    }

    /// Apply the latest pending position. Returns the box to draw if it
    /// changed this frame.
    pub fn flush_frame(&mut self) -> Option<SelectionBox> {
        let end = self.pending_end.flush()?;
        self.current = SelectionBox::new(self.current.start(), end);
        Some(self.current)
    }

    /// The box as last flushed.
    pub fn current(&self) -> SelectionBox {
        self.current
    }

    /// Finish at `screen` and compute the resulting selection.
    ///
    /// A box smaller than `click_threshold` on both axes is a click on
    /// empty canvas: the selection clears (or stays as it was in additive
    /// mode). Otherwise every element intersecting the box is selected.
    pub fn finish<S: ElementStore + ?Sized>(
        mut self,
        screen: Point,
        viewport: &ViewportTransform,
        store: &S,
        click_threshold: f64,
    ) -> Vec<ElementId> {
        self.pending_end.cancel();
        self.current = SelectionBox::new(self.current.start(), screen);
        let mut selected = self.base.take().unwrap_or_default();

        if self.current.is_click(click_threshold) {
            log::debug!("box select treated as click");
            return selected;
        }

        let world = self.current.world_rect(viewport);
        for id in hit_test_rect(store, &world) {
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        log::debug!("box select picked {} element(s)", selected.len());
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::id::BlockType;
    use board_core::model::Element;
    use board_core::store::MemoryStore;
    use board_core::viewport::ViewportState;
    use serde_json::json;

    fn el(name: &str, x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new(
            ElementId::intern(name),
            BlockType::intern("note"),
            Bounds::new(x, y, w, h),
            json!({}),
        )
    }

    fn store() -> MemoryStore {
        MemoryStore::from_elements(vec![
            el("inside", 50.0, 50.0, 20.0, 20.0),
            el("outside", 200.0, 200.0, 10.0, 10.0),
        ])
    }

    #[test]
    fn box_selects_intersecting_only() {
        let vt = ViewportTransform::default();
        let area = SelectionArea::begin(Point::new(0.0, 0.0), None);
        let picked = area.finish(Point::new(100.0, 100.0), &vt, &store(), 5.0);
        assert_eq!(picked, vec![ElementId::intern("inside")]);
    }

    #[test]
    fn reverse_drag_normalizes() {
        let vt = ViewportTransform::default();
        let area = SelectionArea::begin(Point::new(100.0, 100.0), None);
        let picked = area.finish(Point::new(0.0, 0.0), &vt, &store(), 5.0);
        assert_eq!(picked, vec![ElementId::intern("inside")]);
    }

    #[test]
    fn box_converts_through_viewport() {
        // Zoomed 2x and panned: screen (0..100) covers world (100..150).
        let vt = ViewportTransform::default().with_state(ViewportState {
            offset: Point::new(-200.0, -200.0),
            zoom: 2.0,
        });
        let area = SelectionArea::begin(Point::new(0.0, 0.0), None);
        let picked = area.finish(Point::new(100.0, 100.0), &vt, &store(), 5.0);
        assert!(picked.is_empty());

        let area = SelectionArea::begin(Point::new(0.0, 0.0), None);
        let picked = area.finish(Point::new(250.0, 250.0), &vt, &store(), 5.0);
        assert_eq!(picked, vec![ElementId::intern("outside")]);
    }

    #[test]
    fn tiny_box_is_click() {
        let vt = ViewportTransform::default();
        let area = SelectionArea::begin(Point::new(55.0, 55.0), None);
        let picked = area.finish(Point::new(58.0, 57.0), &vt, &store(), 5.0);
        assert!(picked.is_empty(), "a click clears even over an element");
    }

    #[test]
    fn additive_unions_with_base() {
        let vt = ViewportTransform::default();
        let base = vec![ElementId::intern("outside")];
        let area = SelectionArea::begin(Point::new(0.0, 0.0), Some(base.clone()));
        let picked = area.finish(Point::new(100.0, 100.0), &vt, &store(), 5.0);
        assert_eq!(
            picked,
            vec![ElementId::intern("outside"), ElementId::intern("inside")]
        );

        let click = SelectionArea::begin(Point::new(0.0, 0.0), Some(base.clone()));
        assert_eq!(click.finish(Point::new(1.0, 1.0), &vt, &store(), 5.0), base);
    }

    #[test]
    fn moves_coalesce_per_frame() {
        let mut area = SelectionArea::begin(Point::new(0.0, 0.0), None);
        assert!(area.update(Point::new(10.0, 10.0)));
        assert!(!area.update(Point::new(20.0, 20.0)));
        assert!(!area.update(Point::new(30.0, 25.0)));
        let drawn = area.flush_frame().unwrap();
        assert_eq!(drawn.end(), Point::new(30.0, 25.0));
        assert!(area.flush_frame().is_none(), "nothing new this frame");
    }

    #[test]
    fn selection_set_keeps_order_and_uniqueness() {
        let a = ElementId::intern("sa");
        let b = ElementId::intern("sb");
        let mut sel = SelectionSet::new();
        assert!(sel.replace([a, b, a]));
        assert_eq!(sel.ids(), &[a, b]);
        assert!(!sel.replace([a, b]));
        sel.toggle(a);
        assert_eq!(sel.ids(), &[b]);
        sel.toggle(a);
        assert_eq!(sel.ids(), &[b, a]);
    }

    #[test]
    fn prune_drops_missing() {
        let mut sel = SelectionSet::new();
        sel.replace([ElementId::intern("inside"), ElementId::intern("ghost")]);
        assert!(sel.prune(&store()));
        assert_eq!(sel.ids(), &[ElementId::intern("inside")]);
    }
}
