//! Drag engine: live multi-element moves.
//!
//! Positions are always recomputed from the captured start positions plus
//! the total pointer delta, never accumulated per move.

use crate::commands::{Command, ElementMove};
use board_core::geometry::Point;
use board_core::id::ElementId;
use board_core::model::ElementPatch;
use board_core::store::ElementStore;
use smallvec::SmallVec;

/// Live state of one drag gesture.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Elements captured at pointer-down with their start positions. The
    /// gesture stays keyed to these even if the selection changes.
    origins: SmallVec<[(ElementId, Point); 4]>,
    start_screen: Point,
    /// Last applied world-space delta.
    delta: (f64, f64),
}

impl DragSession {
    /// Capture `ids` at their current positions. Unknown ids are skipped;
    /// returns `None` if nothing is left to drag.
    pub fn begin<S: ElementStore + ?Sized>(store: &S, ids: &[ElementId], start_screen: Point) -> Option<Self> {
        let origins: SmallVec<[(ElementId, Point); 4]> = ids
            .iter()
            .filter_map(|id| store.get_element_by_id(*id).map(|el| (*id, el.position())))
            .collect();
        if origins.is_empty() {
            return None;
        }
        log::debug!("drag start: {} element(s)", origins.len());
        Some(Self {
            origins,
            start_screen,
            delta: (0.0, 0.0),
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.origins.iter().map(|(id, _)| *id)
    }

    pub fn delta(&self) -> (f64, f64) {
        self.delta
    }

    /// Move every captured element by the world delta between
    /// `start_screen` and `screen`. With `constrain`, only the dominant
    /// axis moves.
    pub fn update<S: ElementStore + ?Sized>(
        &mut self,
        store: &mut S,
        screen: Point,
        zoom: f64,
        constrain: bool,
    ) -> (f64, f64) {
        let mut dx = (screen.x - self.start_screen.x) / zoom;
        let mut dy = (screen.y - self.start_screen.y) / zoom;
        if constrain {
            if dx.abs() > dy.abs() {
                dy = 0.0;
            } else {
                dx = 0.0;
            }
        }
        self.delta = (dx, dy);
        for (id, start) in &self.origins {
            // Deleted mid-gesture: update returns false, nothing to do.
            store.update_element(*id, &ElementPatch::position(start.offset(dx, dy)));
        }
        self.delta
    }

    /// Close the gesture. Returns the move command for elements that still
    /// exist, or `None` when nothing moved.
    pub fn finish<S: ElementStore + ?Sized>(self, store: &S) -> Option<Command> {
        let moves: SmallVec<[ElementMove; 1]> = self
            .origins
            .iter()
            .filter_map(|(id, from)| {
                let to = store.get_element_by_id(*id)?.position();
                (to != *from).then_some(ElementMove { id: *id, from: *from, to })
            })
            .collect();
        log::debug!("drag finish: {} element(s) moved", moves.len());
        (!moves.is_empty()).then_some(Command::Move { moves })
    }

    /// Abort the gesture, putting every element back.
    pub fn cancel<S: ElementStore + ?Sized>(self, store: &mut S) {
        log::debug!("drag cancelled");
        for (id, start) in &self.origins {
            store.update_element(*id, &ElementPatch::position(*start));
        }
    }
}

/// Build the move command for shifting `ids` by a world delta (keyboard
/// nudge). Returns `None` when none of the ids exist.
pub fn nudge_command<S: ElementStore + ?Sized>(store: &S, ids: &[ElementId], dx: f64, dy: f64) -> Option<Command> {
    let moves: SmallVec<[ElementMove; 1]> = store
        .get_elements_by_ids(ids)
        .into_iter()
        .map(|el| {
            let from = el.position();
            ElementMove {
                id: el.id,
                from,
                to: from.offset(dx, dy),
            }
        })
        .collect();
    (!moves.is_empty()).then_some(Command::Move { moves })
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::geometry::Bounds;
    use board_core::id::BlockType;
    use board_core::model::Element;
    use board_core::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn store() -> MemoryStore {
        let el = |name: &str, x: f64, y: f64| {
            Element::new(
                ElementId::intern(name),
                BlockType::intern("note"),
                Bounds::new(x, y, 50.0, 50.0),
                json!({}),
            )
        };
        MemoryStore::from_elements(vec![el("d_a", 0.0, 0.0), el("d_b", 100.0, 40.0)])
    }

    fn pos(store: &MemoryStore, name: &str) -> Point {
        store.get_element_by_id(ElementId::intern(name)).unwrap().position()
    }

    #[test]
    fn uniform_delta_scaled_by_zoom() {
        let mut s = store();
        let ids = [ElementId::intern("d_a"), ElementId::intern("d_b")];
        let mut drag = DragSession::begin(&s, &ids, Point::new(10.0, 10.0)).unwrap();
        drag.update(&mut s, Point::new(30.0, 50.0), 2.0, false);
        assert_eq!(pos(&s, "d_a"), Point::new(10.0, 20.0));
        assert_eq!(pos(&s, "d_b"), Point::new(110.0, 60.0));

        let cmd = drag.finish(&s).unwrap();
        let Command::Move { moves } = cmd else {
            panic!("expected move");
        };
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].from, Point::new(0.0, 0.0));
        assert_eq!(moves[0].to, Point::new(10.0, 20.0));
    }

    #[test]
    fn shift_constrains_to_dominant_axis() {
        let mut s = store();
        let mut drag = DragSession::begin(&s, &[ElementId::intern("d_a")], Point::ORIGIN).unwrap();
        let delta = drag.update(&mut s, Point::new(30.0, 10.0), 1.0, true);
        assert_eq!(delta, (30.0, 0.0));
        assert_eq!(pos(&s, "d_a"), Point::new(30.0, 0.0));
    }

    #[test]
    fn no_motion_means_no_command() {
        let mut s = store();
        let mut drag = DragSession::begin(&s, &[ElementId::intern("d_a")], Point::ORIGIN).unwrap();
        drag.update(&mut s, Point::ORIGIN, 1.0, false);
        assert!(drag.finish(&s).is_none());
    }

    #[test]
    fn element_deleted_mid_gesture_is_skipped() {
        let mut s = store();
        let ids = [ElementId::intern("d_a"), ElementId::intern("d_b")];
        let mut drag = DragSession::begin(&s, &ids, Point::ORIGIN).unwrap();
        drag.update(&mut s, Point::new(5.0, 5.0), 1.0, false);
        s.delete_element(ElementId::intern("d_b"));
        drag.update(&mut s, Point::new(8.0, 5.0), 1.0, false);

        let Some(Command::Move { moves }) = drag.finish(&s) else {
            panic!("expected move");
        };
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].id, ElementId::intern("d_a"));
    }

    #[test]
    fn cancel_restores_start() {
        let mut s = store();
        let mut drag = DragSession::begin(&s, &[ElementId::intern("d_b")], Point::ORIGIN).unwrap();
        drag.update(&mut s, Point::new(-40.0, 90.0), 1.0, false);
        drag.cancel(&mut s);
        assert_eq!(pos(&s, "d_b"), Point::new(100.0, 40.0));
    }

    #[test]
    fn begin_with_nothing_known_is_none() {
        let s = store();
        assert!(DragSession::begin(&s, &[ElementId::intern("d_ghost")], Point::ORIGIN).is_none());
    }

    #[test]
    fn nudge_builds_absolute_move() {
        let s = store();
        let cmd = nudge_command(&s, &[ElementId::intern("d_b")], 0.0, -10.0).unwrap();
        assert_eq!(
            cmd,
            Command::Move {
                moves: smallvec::smallvec![ElementMove {
                    id: ElementId::intern("d_b"),
                    from: Point::new(100.0, 40.0),
                    to: Point::new(100.0, 30.0),
                }],
            }
        );
    }
}
