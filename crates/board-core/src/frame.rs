//! Per-animation-frame coalescing.
//!
//! Pointer input arrives far more often than the display refreshes. Work
//! that only matters once per frame (selection-box redraw, viewport
//! notifications, culling) goes through these two helpers instead of a
//! queue: only the latest value survives until the next frame callback.

/// Single-slot, latest-value-wins buffer flushed once per frame.
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing anything not yet flushed. Returns `true`
    /// when the slot was empty, i.e. the caller should request a frame.
    pub fn schedule(&mut self, value: T) -> bool {
        self.pending.replace(value).is_none()
    }

    /// Take the pending value in the frame callback.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Dirty flag that fires at most every other frame.
///
/// A change after an idle period is handled on the very next frame; while
/// changes keep coming, every second frame is skipped.
#[derive(Debug, Clone, Default)]
pub struct FrameThrottle {
    dirty: bool,
    skip_next: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Advance one frame. Returns `true` when the owner should recompute now.
    pub fn tick(&mut self) -> bool {
        if self.skip_next {
            self.skip_next = false;
            return false;
        }
        if self.dirty {
            self.dirty = false;
            self.skip_next = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalescer_keeps_latest_only() {
        let mut c = FrameCoalescer::new();
        assert!(c.schedule(1), "first value requests a frame");
        assert!(!c.schedule(2));
        assert!(!c.schedule(3));
        assert_eq!(c.flush(), Some(3));
        assert_eq!(c.flush(), None);
        assert!(c.schedule(4), "empty again after flush");
    }

    #[test]
    fn throttle_skips_every_other_frame_under_load() {
        let mut t = FrameThrottle::new();
        let mut fired = Vec::new();
        for _ in 0..6 {
            t.mark_dirty();
            fired.push(t.tick());
        }
        assert_eq!(fired, [true, false, true, false, true, false]);
    }

    #[test]
    fn throttle_idle_change_fires_immediately() {
        let mut t = FrameThrottle::new();
        assert!(!t.tick());
        t.mark_dirty();
        assert!(t.tick());
        assert!(!t.tick()); // skip frame
        assert!(!t.tick()); // idle
        t.mark_dirty();
        assert!(t.tick());
    }
}
