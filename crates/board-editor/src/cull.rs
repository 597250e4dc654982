//! Viewport culling.
//!
//! Small boards render everything. Above `threshold` elements, only those
//! intersecting the visible world rectangle grown by a buffer margin are
//! kept, so a short pan does not expose unrendered blocks.
//!
//! Recomputation is throttled with a [`FrameThrottle`]: callers mark the
//! culler dirty on every pan/zoom/element change and call
//! [`ViewportCuller::on_frame`] from the animation frame.

use board_core::consts::{CULL_BUFFER_RATIO, CULL_THRESHOLD};
use board_core::frame::FrameThrottle;
use board_core::geometry::{Bounds, Size};
use board_core::id::ElementId;
use board_core::model::Element;
use board_core::viewport::ViewportTransform;

#[derive(Debug, Clone)]
pub struct ViewportCuller {
    threshold: usize,
    /// Margin on each side as a fraction of the visible width/height.
    buffer_ratio: f64,
    throttle: FrameThrottle,
    visible: Vec<ElementId>,
    /// Nothing computed yet; the first frame always recomputes.
    primed: bool,
}

impl Default for ViewportCuller {
    fn default() -> Self {
        Self::new(CULL_THRESHOLD, CULL_BUFFER_RATIO)
    }
}

impl ViewportCuller {
    pub fn new(threshold: usize, buffer_ratio: f64) -> Self {
        Self {
            threshold,
            buffer_ratio,
            throttle: FrameThrottle::new(),
            visible: Vec::new(),
            primed: false,
        }
    }

    /// World rectangle an element must intersect to be kept.
    pub fn cull_rect(&self, viewport: &ViewportTransform, screen: Size) -> Bounds {
        let rect = viewport.visible_world_rect(screen);
        rect.inflate(rect.width * self.buffer_ratio, rect.height * self.buffer_ratio)
    }

    /// Elements worth rendering, in paint order.
    pub fn cull<'a>(
        &self,
        elements: &'a [Element],
        viewport: &ViewportTransform,
        screen: Size,
    ) -> Vec<&'a Element> {
        if elements.len() < self.threshold {
            return elements.iter().collect();
        }
        let rect = self.cull_rect(viewport, screen);
        elements
            .iter()
            .filter(|el| el.bounds().intersects(&rect))
            .collect()
    }

    /// Request a recompute on an upcoming frame.
    pub fn mark_dirty(&mut self) {
        self.throttle.mark_dirty();
    }

    /// Frame callback. Recomputes the cached visible set when the throttle
    /// allows; returns whether it did.
    pub fn on_frame(&mut self, elements: &[Element], viewport: &ViewportTransform, screen: Size) -> bool {
        if !self.primed {
            self.throttle.mark_dirty();
            self.primed = true;
        }
        if !self.throttle.tick() {
            return false;
        }
        self.visible = self
            .cull(elements, viewport, screen)
            .into_iter()
            .map(|el| el.id)
            .collect();
        log::trace!("cull: {}/{} visible", self.visible.len(), elements.len());
        true
    }

    /// Visible ids as of the last recompute.
    pub fn visible(&self) -> &[ElementId] {
        &self.visible
    }

    pub fn is_dirty(&self) -> bool {
        self.throttle.is_dirty()
    }
}
