//! Shared fixtures for the board-editor integration tests.

#![allow(dead_code)]

use board_core::clock::ManualClock;
use board_core::config::EditorConfig;
use board_core::geometry::{Bounds, Size};
use board_core::id::{BlockType, ElementId};
use board_core::model::Element;
use board_core::store::{ElementStore, MemoryStore};
use board_editor::registry::{BlockDescriptor, BlockRenderer};
use board_editor::resize::ResizeConfig;
use board_editor::{CanvasEditor, Registries};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

pub const SCREEN: Size = Size {
    width: 800.0,
    height: 600.0,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Noop;

impl BlockRenderer for Noop {
    fn render(&self, _element: &Element, _screen_bounds: Bounds) {}
}

/// Records every element it is asked to draw.
#[derive(Clone, Default)]
pub struct Recorder(pub Rc<RefCell<Vec<(ElementId, Bounds)>>>);

impl BlockRenderer for Recorder {
    fn render(&self, element: &Element, screen_bounds: Bounds) {
        self.0.borrow_mut().push((element.id, screen_bounds));
    }
}

/// `note` (free resize), `image` (2:1 locked, min 50x50) and `text`
/// (width-only, content-driven height).
pub fn registries_with(note_renderer: impl BlockRenderer + 'static) -> Registries {
    let mut r = Registries::new();
    r.blocks
        .register(
            BlockDescriptor::new("note")
                .renderer(note_renderer)
                .default_size(100.0, 50.0)
                .default_payload(|| json!({ "text": "" })),
        )
        .unwrap();
    r.blocks
        .register(
            BlockDescriptor::new("image")
                .renderer(Noop)
                .default_size(200.0, 100.0)
                .default_payload(|| json!({ "src": null }))
                .resize(ResizeConfig::new(50.0, 50.0).with_aspect_ratio(2.0)),
        )
        .unwrap();
    r.blocks
        .register(
            BlockDescriptor::new("text")
                .renderer(Noop)
                .default_size(200.0, 40.0)
                .default_payload(|| json!({ "text": "" }))
                .resize(ResizeConfig::new(80.0, 20.0).content_driven_height().with_padding(8.0)),
        )
        .unwrap();
    r
}

pub fn editor_with(registries: Registries, config: EditorConfig) -> (CanvasEditor, Rc<ManualClock>) {
    init_logging();
    let clock = Rc::new(ManualClock::new());
    let mut ed = CanvasEditor::new(MemoryStore::new(), Rc::new(registries), config)
        .expect("valid config")
        .with_clock(clock.clone());
    ed.set_screen_size(SCREEN);
    (ed, clock)
}

pub fn editor() -> (CanvasEditor, Rc<ManualClock>) {
    editor_with(registries_with(Noop), EditorConfig::default())
}

/// Put an element straight into the store, bypassing history.
pub fn place(ed: &mut CanvasEditor, name: &str, kind: &str, bounds: Bounds) -> ElementId {
    let id = ElementId::intern(name);
    let added = ed.store_mut().add_element(Element::new(
        id,
        BlockType::intern(kind),
        bounds,
        json!({ "name": name }),
    ));
    assert!(added, "{name} placed twice");
    id
}

pub fn bounds_of(ed: &CanvasEditor, id: ElementId) -> Bounds {
    ed.store().get_element_by_id(id).expect("element exists").bounds()
}
