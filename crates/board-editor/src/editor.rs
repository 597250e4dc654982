//! `CanvasEditor`: the single entry point a host wires input into.
//!
//! It owns the store, viewport, selection, history and gesture state, and
//! borrows the block/action registries through an `Rc`. Everything runs on
//! one thread: each input event is handled to completion, and per-frame
//! work (viewport notifications, selection-box redraw, culling) waits for
//! [`CanvasEditor::on_animation_frame`].

use crate::actions::{ActionContext, ActionRegistry, ResolvedAction};
use crate::commands::{Command, CommandStack};
use crate::cull::ViewportCuller;
use crate::drag::{nudge_command, DragSession};
use crate::hit::{hit_test, hit_test_handle};
use crate::input::{Button, InputEvent, Modifiers};
use crate::mode::{Gesture, GestureKind, Mode, ModeController, PointerRoute};
use crate::registry::{BlockRenderer, BlockTypeRegistry, RegistryError};
use crate::resize::ResizeSession;
use crate::selection::{SelectionArea, SelectionBox, SelectionSet};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use board_core::clock::{Clock, SystemClock};
use board_core::config::{ConfigError, EditorConfig};
use board_core::events::{CanvasEvent, EventBus, SubscriptionId};
use board_core::frame::FrameCoalescer;
use board_core::geometry::{Bounds, Point, Size};
use board_core::id::{BlockType, ElementId};
use board_core::model::{CanvasSnapshot, Element, ElementPatch};
use board_core::store::{ElementStore, MemoryStore};
use board_core::viewport::{ViewportState, ViewportTransform};
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Block and action registries, filled once at startup and shared.
#[derive(Debug, Default)]
pub struct Registries {
    pub blocks: BlockTypeRegistry,
    pub actions: ActionRegistry,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One element ready to draw.
#[derive(Clone)]
pub struct RenderItem<'a> {
    pub element: &'a Element,
    pub screen_bounds: Bounds,
    pub renderer: Rc<dyn BlockRenderer>,
}

/// What a frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// A `viewport:changed` event went out.
    pub viewport_changed: bool,
    /// New selection box to draw, if it moved this frame.
    pub selection_box: Option<SelectionBox>,
    /// The visible set was recomputed.
    pub culled: bool,
}

pub struct CanvasEditor<S: ElementStore = MemoryStore> {
    store: S,
    registries: Rc<Registries>,
    config: EditorConfig,
    viewport: ViewportTransform,
    screen: Size,
    selection: SelectionSet,
    history: CommandStack,
    events: EventBus,
    clock: Rc<dyn Clock>,
    modes: ModeController,
    culler: ViewportCuller,
    pending_viewport: FrameCoalescer<ViewportState>,
    /// Latest measured content height per element, for content-driven types.
    content_heights: HashMap<ElementId, f64>,
}

impl CanvasEditor<MemoryStore> {
    /// Restore a persisted board into a fresh in-memory store.
    pub fn from_snapshot(
        snapshot: CanvasSnapshot,
        registries: Rc<Registries>,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let mut editor = Self::new(MemoryStore::from_elements(snapshot.elements), registries, config)?;
        editor.viewport.set_state(snapshot.viewport);
        Ok(editor)
    }
}

impl<S: ElementStore> CanvasEditor<S> {
    /// Fails if `config` does not pass [`EditorConfig::validate`].
    pub fn new(store: S, registries: Rc<Registries>, config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        let history = CommandStack::new(config.history_capacity).with_merge_window(config.merge_window());
        Ok(Self {
            store,
            registries,
            viewport: ViewportTransform::new(config.zoom_min, config.zoom_max),
            screen: Size::new(0.0, 0.0),
            selection: SelectionSet::new(),
            history,
            events: EventBus::new(),
            clock: Rc::new(SystemClock::new()),
            modes: ModeController::new(),
            culler: ViewportCuller::new(config.cull_threshold, config.cull_buffer_ratio),
            pending_viewport: FrameCoalescer::new(),
            content_heights: HashMap::new(),
            config,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access for host-side changes (sync, import). Marks the
    /// visible set stale.
    pub fn store_mut(&mut self) -> &mut S {
        self.culler.mark_dirty();
        &mut self.store
    }

    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub fn selection(&self) -> &[ElementId] {
        self.selection.ids()
    }

    pub fn history(&self) -> &CommandStack {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.modes.set_mode(mode);
    }

    pub fn gesture_kind(&self) -> GestureKind {
        self.modes.gesture_kind()
    }

    /// The rubber band as last flushed, while box-selecting.
    pub fn selection_box(&self) -> Option<SelectionBox> {
        match self.modes.gesture() {
            Gesture::BoxSelecting(area) => Some(area.current()),
            _ => None,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CanvasEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn set_screen_size(&mut self, screen: Size) {
        if screen != self.screen {
            self.screen = screen;
            self.culler.mark_dirty();
        }
    }

    pub fn screen_size(&self) -> Size {
        self.screen
    }

    /// Current elements and viewport, for the persistence layer.
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            elements: self.store.elements().to_vec(),
            viewport: self.viewport.state(),
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Dispatch a normalized input event. Returns whether it was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.on_pointer_down(Point::new(*x, *y), *button, *modifiers),
            InputEvent::PointerMove { x, y, modifiers } => self.on_pointer_move(Point::new(*x, *y), *modifiers),
            InputEvent::PointerUp { x, y, modifiers, .. } => self.on_pointer_up(Point::new(*x, *y), *modifiers),
            InputEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
            } => self.on_wheel(Point::new(*x, *y), *dx, *dy, *modifiers),
            InputEvent::KeyDown { key, modifiers } => self.on_key_down(key, *modifiers),
            InputEvent::KeyUp { key, .. } => self.on_key_up(key),
        }
    }

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, mods: Modifiers) -> bool {
        match self.modes.route_pointer_down(button) {
            PointerRoute::Ignore => false,
            PointerRoute::Pan => {
                self.modes.begin(Gesture::Panning { last: screen });
                true
            }
            PointerRoute::Select => {
                self.select_pointer_down(screen, mods);
                true
            }
        }
    }

    fn select_pointer_down(&mut self, screen: Point, mods: Modifiers) {
        let world = self.viewport.screen_to_world(screen);

        if let Some(session) = self.handle_under(world) {
            self.modes.begin(Gesture::Resizing(session));
            return;
        }

        if let Some(id) = hit_test(&self.store, world) {
            if mods.shift {
                self.selection.toggle(id);
                self.emit_selection();
                if !self.selection.contains(id) {
                    return;
                }
            } else if !self.selection.contains(id) {
                self.set_selection([id]);
            }
            if let Some(drag) = DragSession::begin(&self.store, self.selection.ids(), screen) {
                self.modes.begin(Gesture::Dragging(drag));
            }
            return;
        }

        let base = mods.shift.then(|| self.selection.ids().to_vec());
        self.modes.begin(Gesture::BoxSelecting(SelectionArea::begin(screen, base)));
    }

    /// Resize handle of a selected element under `world`, topmost first.
    fn handle_under(&self, world: Point) -> Option<ResizeSession> {
        let slop = self.viewport.screen_dist_to_world(self.config.handle_radius_px);
        self.selection.ids().iter().rev().find_map(|id| {
            let element = self.store.get_element_by_id(*id)?;
            let config = self.registries.blocks.resize_config(element.kind)?;
            let handle = hit_test_handle(element, &config, world, slop)?;
            Some(ResizeSession::begin(*id, handle, config, world, element.bounds()))
        })
    }

    pub fn on_pointer_move(&mut self, screen: Point, mods: Modifiers) -> bool {
        let zoom = self.viewport.zoom();
        match self.modes.gesture_mut() {
            Gesture::Idle => false,
            Gesture::Panning { last } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                if self.viewport.pan(dx, dy) {
                    self.pending_viewport.schedule(self.viewport.state());
                    self.culler.mark_dirty();
                }
                true
            }
            Gesture::BoxSelecting(area) => {
                area.update(screen);
                true
            }
            Gesture::Dragging(drag) => {
                drag.update(&mut self.store, screen, zoom, mods.shift);
                self.culler.mark_dirty();
                true
            }
            Gesture::Resizing(session) => {
                let world = self.viewport.screen_to_world(screen);
                let content = self.content_heights.get(&session.id).copied();
                let bounds = session.update(world, mods.shift, content);
                self.store.update_element(session.id, &ElementPatch::bounds(bounds));
                self.culler.mark_dirty();
                true
            }
        }
    }

    /// Finish the current gesture. A pointer-up without a matching
    /// pointer-down does nothing.
    pub fn on_pointer_up(&mut self, screen: Point, mods: Modifiers) -> bool {
        let now = self.clock.now();
        match self.modes.take_gesture() {
            Gesture::Idle => false,
            Gesture::Panning { .. } => true,
            Gesture::BoxSelecting(area) => {
                let picked = area.finish(
                    screen,
                    &self.viewport,
                    &self.store,
                    self.config.click_threshold_px,
                );
                self.set_selection(picked);
                true
            }
            Gesture::Dragging(mut drag) => {
                drag.update(&mut self.store, screen, self.viewport.zoom(), mods.shift);
                if let Some(cmd) = drag.finish(&self.store) {
                    self.history.record(cmd, now);
                }
                self.culler.mark_dirty();
                true
            }
            Gesture::Resizing(mut session) => {
                if !self.store.contains(session.id) {
                    log::debug!("resize target {} vanished mid-gesture", session.id);
                    return true;
                }
                let world = self.viewport.screen_to_world(screen);
                let content = self.content_heights.get(&session.id).copied();
                let bounds = session.update(world, mods.shift, content);
                self.store.update_element(session.id, &ElementPatch::bounds(bounds));
                if session.changed() {
                    self.history.record(
                        Command::Resize {
                            id: session.id,
                            from: session.initial,
                            to: session.current,
                        },
                        now,
                    );
                }
                self.culler.mark_dirty();
                true
            }
        }
    }

    /// Cmd/Ctrl + wheel zooms at the cursor, plain wheel pans.
    pub fn on_wheel(&mut self, screen: Point, dx: f64, dy: f64, mods: Modifiers) -> bool {
        let changed = if mods.command() {
            if dy == 0.0 {
                return false;
            }
            let factor = if dy < 0.0 {
                self.config.zoom_step
            } else {
                1.0 / self.config.zoom_step
            };
            self.viewport.zoom_by(factor, screen)
        } else {
            self.viewport.pan(-dx, -dy)
        };
        self.viewport_touched(changed);
        true
    }

    pub fn on_key_down(&mut self, key: &str, mods: Modifiers) -> bool {
        if key == " " {
            self.modes.press_space();
            return true;
        }
        if key == "Escape" && !self.modes.is_idle() {
            self.cancel_gesture();
            return true;
        }
        if !self.modes.is_idle() {
            return false;
        }
        let Some(action) = ShortcutMap::resolve(key, mods.ctrl, mods.shift, mods.alt, mods.meta) else {
            return false;
        };
        self.apply_shortcut(action);
        true
    }

    pub fn on_key_up(&mut self, key: &str) -> bool {
        if key == " " {
            self.modes.release_space();
            return true;
        }
        false
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Duplicate => {
                self.duplicate_selected();
            }
            ShortcutAction::Nudge { direction, large } => {
                let step = if large {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                let (ux, uy) = direction.unit();
                self.nudge(ux * step, uy * step);
            }
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ZoomToFit => self.zoom_to_fit(),
            ShortcutAction::ZoomToSelection => self.zoom_to_selection(),
            ShortcutAction::ZoomReset => self.reset_view(),
            ShortcutAction::PanStart => self.modes.press_space(),
            ShortcutAction::Deselect => self.deselect(),
        }
    }

    /// Abort a drag or resize, putting the captured geometry back. No
    /// history entry is recorded.
    pub fn cancel_gesture(&mut self) {
        match self.modes.take_gesture() {
            Gesture::Dragging(drag) => drag.cancel(&mut self.store),
            Gesture::Resizing(session) => {
                log::debug!("resize cancelled");
                self.store
                    .update_element(session.id, &ElementPatch::bounds(session.initial));
            }
            Gesture::BoxSelecting(_) | Gesture::Panning { .. } | Gesture::Idle => {}
        }
        self.culler.mark_dirty();
    }

    // ─── Frame ───────────────────────────────────────────────────────────

    /// Animation-frame callback: flush coalesced work.
    pub fn on_animation_frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        if let Some(state) = self.pending_viewport.flush() {
            log::trace!("viewport flush {state:?}");
            self.events.emit(CanvasEvent::ViewportChanged(state));
            report.viewport_changed = true;
        }
        if let Gesture::BoxSelecting(area) = self.modes.gesture_mut() {
            report.selection_box = area.flush_frame();
        }
        report.culled = self
            .culler
            .on_frame(self.store.elements(), &self.viewport, self.screen);
        report
    }

    /// Elements to draw this frame, in paint order, with their renderer
    /// and screen rectangle. Uses the visible set from the last frame;
    /// elements of unregistered types are skipped.
    pub fn render_list(&self) -> Vec<RenderItem<'_>> {
        self.culler
            .visible()
            .iter()
            .filter_map(|id| self.store.get_element_by_id(*id))
            .filter_map(|element| {
                let Some(renderer) = self.registries.blocks.renderer(element.kind) else {
                    log::warn!("no renderer for `{}` ({}); skipping", element.kind, element.id);
                    return None;
                };
                Some(RenderItem {
                    element,
                    screen_bounds: self.viewport.world_bounds_to_screen(element.bounds()),
                    renderer,
                })
            })
            .collect()
    }

    /// Draw every item of [`Self::render_list`].
    pub fn render(&self) {
        for item in self.render_list() {
            item.renderer.render(item.element, item.screen_bounds);
        }
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    fn viewport_touched(&mut self, changed: bool) {
        if changed {
            self.pending_viewport.schedule(self.viewport.state());
            self.culler.mark_dirty();
        }
    }

    fn screen_center(&self) -> Point {
        Point::new(self.screen.width / 2.0, self.screen.height / 2.0)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let changed = self.viewport.pan(dx, dy);
        self.viewport_touched(changed);
    }

    pub fn zoom_at(&mut self, cursor: Point, zoom: f64) {
        let changed = self.viewport.zoom_at(cursor, zoom);
        self.viewport_touched(changed);
    }

    pub fn set_viewport(&mut self, state: ViewportState) {
        let changed = self.viewport.set_state(state);
        self.viewport_touched(changed);
    }

    pub fn zoom_in(&mut self) {
        let changed = self.viewport.zoom_by(self.config.zoom_step, self.screen_center());
        self.viewport_touched(changed);
    }

    pub fn zoom_out(&mut self) {
        let changed = self
            .viewport
            .zoom_by(1.0 / self.config.zoom_step, self.screen_center());
        self.viewport_touched(changed);
    }

    pub fn zoom_to_fit(&mut self) {
        let all = self.store.elements().iter().map(Element::bounds).reduce(|a, b| a.union(&b));
        self.focus(all);
    }

    pub fn zoom_to_selection(&mut self) {
        let selected = self
            .store
            .get_elements_by_ids(self.selection.ids())
            .into_iter()
            .map(Element::bounds)
            .reduce(|a, b| a.union(&b));
        self.focus(selected);
    }

    fn focus(&mut self, bounds: Option<Bounds>) {
        let Some(bounds) = bounds else {
            return;
        };
        let changed = self
            .viewport
            .fit_bounds(bounds, self.screen, self.config.fit_padding_px);
        self.viewport_touched(changed);
    }

    pub fn reset_view(&mut self) {
        let changed = self.viewport.reset();
        self.viewport_touched(changed);
    }

    // ─── Selection ───────────────────────────────────────────────────────

    fn emit_selection(&mut self) {
        self.events
            .emit(CanvasEvent::ElementSelected(self.selection.to_smallvec()));
    }

    fn set_selection(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        if self.selection.replace(ids) {
            self.emit_selection();
        }
    }

    /// Replace the selection with the given ids that exist in the store.
    pub fn select(&mut self, ids: &[ElementId]) {
        let existing: Vec<ElementId> = ids.iter().copied().filter(|id| self.store.contains(*id)).collect();
        self.set_selection(existing);
    }

    pub fn select_all(&mut self) {
        let all: Vec<ElementId> = self.store.elements().iter().map(|el| el.id).collect();
        self.set_selection(all);
    }

    pub fn deselect(&mut self) {
        if self.selection.clear() {
            self.emit_selection();
        }
    }

    /// Drop selection and measured heights of elements no longer in the
    /// store.
    fn prune_selection(&mut self) {
        let store = &self.store;
        self.content_heights.retain(|id, _| store.contains(*id));
        if self.selection.prune(&self.store) {
            self.emit_selection();
        }
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Create a block of a registered type centred on `at` (world space),
    /// select it, and return its id.
    pub fn create_block(&mut self, kind: &str, at: Point) -> Result<ElementId, EditorError> {
        let block_type = BlockType::intern(kind);
        let descriptor = self
            .registries
            .blocks
            .get(block_type)
            .ok_or_else(|| EditorError::UnknownBlockType(kind.to_string()))?;
        let payload = descriptor
            .create_default_payload
            .as_ref()
            .map_or(Value::Null, |make| make());
        let size = descriptor.default_size;
        let bounds = Bounds::new(
            at.x - size.width / 2.0,
            at.y - size.height / 2.0,
            size.width,
            size.height,
        );
        let element = Element::new(ElementId::with_prefix(kind), block_type, bounds, payload);
        let id = element.id;

        let now = self.clock.now();
        self.history.execute(&mut self.store, Command::Create { element }, now);
        self.culler.mark_dirty();
        log::debug!("created {kind} {id}");

        self.events.emit(CanvasEvent::ElementCreated(id));
        self.set_selection([id]);
        Ok(id)
    }

    /// Delete every selected element as one undo step. Returns how many
    /// were removed.
    pub fn delete_selected(&mut self) -> usize {
        let Some(cmd) = Command::delete_many(&self.store, self.selection.ids()) else {
            return 0;
        };
        let count = cmd.affected_ids().len();
        let now = self.clock.now();
        self.history.execute(&mut self.store, cmd, now);
        self.culler.mark_dirty();
        self.prune_selection();
        count
    }

    /// Copy the selection, offset by the configured distance. The copies
    /// become the selection.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let offset = self.config.duplicate_offset;
        let copies: Vec<Element> = self
            .store
            .get_elements_by_ids(self.selection.ids())
            .into_iter()
            .map(|el| {
                let mut copy = el.clone();
                copy.id = ElementId::with_prefix(el.kind.as_str());
                copy.x += offset;
                copy.y += offset;
                copy
            })
            .collect();
        if copies.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ElementId> = copies.iter().map(|el| el.id).collect();
        let now = self.clock.now();
        self.history.execute(&mut self.store, Command::duplicate(copies), now);
        self.culler.mark_dirty();
        for id in &ids {
            self.events.emit(CanvasEvent::ElementCreated(*id));
        }
        self.set_selection(ids.iter().copied());
        ids
    }

    /// Replace an element's payload through history.
    pub fn update_payload(&mut self, id: ElementId, payload: Value) -> bool {
        let Some(element) = self.store.get_element_by_id(id) else {
            return false;
        };
        if element.payload == payload {
            return false;
        }
        let cmd = Command::UpdatePayload {
            id,
            before: element.payload.clone(),
            after: payload,
        };
        let now = self.clock.now();
        self.history.execute(&mut self.store, cmd, now);
        true
    }

    /// Move the selection by a world delta. Bursts inside the merge window
    /// collapse into one undo step.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> bool {
        let Some(cmd) = nudge_command(&self.store, self.selection.ids(), dx, dy) else {
            return false;
        };
        let now = self.clock.now();
        self.history.execute(&mut self.store, cmd, now);
        self.culler.mark_dirty();
        true
    }

    /// Feed the measured content height of an element. Content-driven
    /// types pick it up immediately when idle, or on the next move of an
    /// active resize. This is layout, not history.
    pub fn set_content_height(&mut self, id: ElementId, content_height: f64) -> bool {
        if !content_height.is_finite() || content_height < 0.0 {
            return false;
        }
        let Some(element) = self.store.get_element_by_id(id) else {
            return false;
        };
        self.content_heights.insert(id, content_height);
        if let Gesture::Resizing(session) = self.modes.gesture() {
            if session.id == id {
                return true;
            }
        }
        let Some(config) = self.registries.blocks.resize_config(element.kind) else {
            return false;
        };
        if !config.content_height {
            return false;
        }
        let height = config.height_for_content(content_height);
        if element.height == height {
            return false;
        }
        self.culler.mark_dirty();
        self.store.update_element(id, &ElementPatch::height(height))
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Option<String> {
        if !self.modes.is_idle() {
            return None;
        }
        let desc = self.history.undo(&mut self.store)?;
        log::debug!("undo `{desc}`");
        self.culler.mark_dirty();
        self.prune_selection();
        Some(desc)
    }

    pub fn redo(&mut self) -> Option<String> {
        if !self.modes.is_idle() {
            return None;
        }
        let desc = self.history.redo(&mut self.store)?;
        log::debug!("redo `{desc}`");
        self.culler.mark_dirty();
        self.prune_selection();
        Some(desc)
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Toolbar / context-menu entries for one element.
    pub fn actions_for(&self, id: ElementId) -> Vec<ResolvedAction> {
        let Some(element) = self.store.get_element_by_id(id) else {
            return Vec::new();
        };
        let ctx = ActionContext {
            element: Some(element),
            selection: self.selection.ids(),
            zoom: self.viewport.zoom(),
        };
        self.action_registry().actions_for_block(element.kind, id, &ctx)
    }

    pub fn invoke_action(&self, action_id: &str, id: ElementId) -> bool {
        let Some(element) = self.store.get_element_by_id(id) else {
            return false;
        };
        let ctx = ActionContext {
            element: Some(element),
            selection: self.selection.ids(),
            zoom: self.viewport.zoom(),
        };
        self.action_registry().invoke(action_id, id, element.kind, &ctx)
    }

    fn action_registry(&self) -> &ActionRegistry {
        &self.registries.actions
    }
}
