//! The element store contract and its in-memory implementation.
//!
//! The interaction engine never owns element storage. It talks to an
//! [`ElementStore`], a synchronous in-memory collection whose backend
//! (sync engine, CRDT, plain vector) is the host's business. [`MemoryStore`]
//! is the reference implementation used by the editor and its tests.

use crate::id::ElementId;
use crate::model::{Element, ElementPatch};
use std::collections::HashMap;

/// Canonical in-memory collection of elements, in paint order.
pub trait ElementStore {
    fn get_element_by_id(&self, id: ElementId) -> Option<&Element>;

    /// All elements, bottom to top.
    fn elements(&self) -> &[Element];

    /// Append on top. Returns `false` (and leaves the store unchanged) if
    /// the id is already present.
    fn add_element(&mut self, element: Element) -> bool;

    /// Insert at a specific paint index (clamped to the end). Used to put a
    /// deleted element back exactly where it was.
    fn insert_element_at(&mut self, index: usize, element: Element) -> bool;

    /// Merge `patch` into the element. Returns `false` for unknown ids.
    fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool;

    /// Remove and return the element.
    fn delete_element(&mut self, id: ElementId) -> Option<Element>;

    /// Paint index of an element.
    fn index_of(&self, id: ElementId) -> Option<usize>;

    /// Look up several ids at once, skipping unknown ones, in `ids` order.
    fn get_elements_by_ids(&self, ids: &[ElementId]) -> Vec<&Element> {
        ids.iter().filter_map(|id| self.get_element_by_id(*id)).collect()
    }

    fn contains(&self, id: ElementId) -> bool {
        self.get_element_by_id(id).is_some()
    }

    fn len(&self) -> usize {
        self.elements().len()
    }

    fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }
}

/// Vector-backed store with an id → index map for O(1) lookups.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    elements: Vec<Element>,
    index: HashMap<ElementId, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a persisted element list. Later duplicates of an
    /// id are dropped with a warning; elements with non-finite geometry
    /// are skipped.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut store = Self::new();
        for element in elements {
            if !element.bounds().is_finite() {
                log::warn!("dropping {} with non-finite geometry", element.id);
                continue;
            }
            let id = element.id;
            if !store.add_element(element) {
                log::warn!("dropping duplicate element {id}");
            }
        }
        store
    }

    fn reindex_from(&mut self, start: usize) {
        for (i, el) in self.elements.iter().enumerate().skip(start) {
            self.index.insert(el.id, i);
        }
    }
}

impl ElementStore for MemoryStore {
    fn get_element_by_id(&self, id: ElementId) -> Option<&Element> {
        self.index.get(&id).map(|&i| &self.elements[i])
    }

    fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn add_element(&mut self, element: Element) -> bool {
        let at = self.elements.len();
        self.insert_element_at(at, element)
    }

    fn insert_element_at(&mut self, index: usize, element: Element) -> bool {
        if self.index.contains_key(&element.id) {
            return false;
        }
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
        self.reindex_from(index);
        true
    }

    fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if !patch.is_finite() {
            log::warn!("ignoring non-finite update for {id}");
            return false;
        }
        match self.index.get(&id) {
            Some(&i) => {
                self.elements[i].apply(patch);
                true
            }
            None => false,
        }
    }

    fn delete_element(&mut self, id: ElementId) -> Option<Element> {
        let i = self.index.remove(&id)?;
        let removed = self.elements.remove(i);
        self.reindex_from(i);
        Some(removed)
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.index.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::id::BlockType;
    use serde_json::json;

    fn el(name: &str) -> Element {
        Element::new(
            ElementId::intern(name),
            BlockType::intern("note"),
            Bounds::new(0.0, 0.0, 10.0, 10.0),
            json!({}),
        )
    }

    #[test]
    fn add_get_delete() {
        let mut store = MemoryStore::new();
        assert!(store.add_element(el("a")));
        assert!(store.add_element(el("b")));
        assert!(!store.add_element(el("a")), "duplicate id must be rejected");
        assert_eq!(store.len(), 2);

        let removed = store.delete_element(ElementId::intern("a")).unwrap();
        assert_eq!(removed.id, ElementId::intern("a"));
        assert!(store.get_element_by_id(ElementId::intern("a")).is_none());
        assert_eq!(store.index_of(ElementId::intern("b")), Some(0));
    }

    #[test]
    fn insert_at_keeps_index_consistent() {
        let mut store = MemoryStore::new();
        store.add_element(el("x1"));
        store.add_element(el("x3"));
        store.insert_element_at(1, el("x2"));
        let order: Vec<&str> = store.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, ["x1", "x2", "x3"]);
        assert_eq!(store.index_of(ElementId::intern("x3")), Some(2));
        assert_eq!(
            store.get_element_by_id(ElementId::intern("x3")).unwrap().id,
            ElementId::intern("x3")
        );
    }

    #[test]
    fn update_rejects_unknown_and_non_finite() {
        let mut store = MemoryStore::new();
        store.add_element(el("u"));
        let id = ElementId::intern("u");
        assert!(store.update_element(id, &ElementPatch::height(42.0)));
        assert_eq!(store.get_element_by_id(id).unwrap().height, 42.0);
        assert!(!store.update_element(ElementId::intern("missing"), &ElementPatch::height(1.0)));
        assert!(!store.update_element(id, &ElementPatch::height(f64::INFINITY)));
        assert_eq!(store.get_element_by_id(id).unwrap().height, 42.0);
    }

    #[test]
    fn by_ids_skips_unknown() {
        let mut store = MemoryStore::new();
        store.add_element(el("p"));
        store.add_element(el("q"));
        let ids = [
            ElementId::intern("q"),
            ElementId::intern("nope"),
            ElementId::intern("p"),
        ];
        let found: Vec<&str> = store
            .get_elements_by_ids(&ids)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(found, ["q", "p"]);
    }

    #[test]
    fn from_elements_drops_duplicates() {
        let store = MemoryStore::from_elements(vec![el("d"), el("d"), el("e")]);
        assert_eq!(store.len(), 2);
    }
}
