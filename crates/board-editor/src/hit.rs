//! Hit testing: point → element, rectangle → elements, point → handle.
//!
//! Walks the store in reverse paint order so the topmost element wins.

use crate::resize::{ResizeConfig, ResizeHandle};
use board_core::geometry::{Bounds, Point};
use board_core::id::ElementId;
use board_core::model::Element;
use board_core::store::ElementStore;

/// Find the topmost element containing the world-space point.
/// Returns `None` for empty canvas.
pub fn hit_test<S: ElementStore + ?Sized>(store: &S, world: Point) -> Option<ElementId> {
    store
        .elements()
        .iter()
        .rev()
        .find(|el| el.bounds().contains(world))
        .map(|el| el.id)
}

/// All elements whose bounds intersect `rect` (world space), in paint order.
/// Used for box selection.
pub fn hit_test_rect<S: ElementStore + ?Sized>(store: &S, rect: &Bounds) -> Vec<ElementId> {
    store
        .elements()
        .iter()
        .filter(|el| el.bounds().intersects(rect))
        .map(|el| el.id)
        .collect()
}

/// Find the resize handle of `element` under the world-space point.
///
/// `slop` is the hit radius in world units (screen radius / zoom). Only
/// handles `config` allows are considered; when two overlap (tiny
/// elements), the nearest wins and corners beat edges on a tie.
pub fn hit_test_handle(
    element: &Element,
    config: &ResizeConfig,
    world: Point,
    slop: f64,
) -> Option<ResizeHandle> {
    let bounds = element.bounds();
    let mut best: Option<(ResizeHandle, f64)> = None;
    for handle in ResizeHandle::ALL {
        if !config.allows(handle) {
            continue;
        }
        let d = handle.anchor_point(&bounds).distance(world);
        if d > slop {
            continue;
        }
        let better = match best {
            None => true,
            Some((prev, prev_d)) => d < prev_d || (d == prev_d && handle.is_corner() && !prev.is_corner()),
        };
        if better {
            best = Some((handle, d));
        }
    }
    best.map(|(h, _)| h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::id::BlockType;
    use board_core::store::MemoryStore;
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
            el("below", 0.0, 0.0, 100.0, 100.0),
            el("above", 50.0, 50.0, 100.0, 100.0),
            el("far", 500.0, 500.0, 10.0, 10.0),
        ])
    }

    #[test]
    fn topmost_wins() {
        let s = store();
        assert_eq!(hit_test(&s, Point::new(75.0, 75.0)), Some(ElementId::intern("above")));
        assert_eq!(hit_test(&s, Point::new(10.0, 10.0)), Some(ElementId::intern("below")));
        assert_eq!(hit_test(&s, Point::new(300.0, 300.0)), None);
    }

    #[test]
    fn rect_selects_intersecting_in_paint_order() {
        let s = store();
        let ids = hit_test_rect(&s, &Bounds::new(90.0, 90.0, 20.0, 20.0));
        assert_eq!(ids, vec![ElementId::intern("below"), ElementId::intern("above")]);
    }

    #[test]
    fn handle_hit_uses_slop() {
        let e = el("handles", 0.0, 0.0, 100.0, 50.0);
        let cfg = ResizeConfig::default();
        assert_eq!(hit_test_handle(&e, &cfg, Point::new(103.0, 52.0), 8.0), Some(ResizeHandle::Se));
        assert_eq!(hit_test_handle(&e, &cfg, Point::new(100.0, 25.0), 8.0), Some(ResizeHandle::E));
        assert_eq!(hit_test_handle(&e, &cfg, Point::new(50.0, 25.0), 8.0), None);
    }

    #[test]
    fn disabled_handles_are_not_hit() {
        let e = el("content", 0.0, 0.0, 100.0, 50.0);
        let cfg = ResizeConfig::default().content_driven_height();
        assert_eq!(hit_test_handle(&e, &cfg, Point::new(100.0, 50.0), 4.0), None);
        assert_eq!(hit_test_handle(&e, &cfg, Point::new(0.0, 25.0), 4.0), Some(ResizeHandle::W));
    }
}
