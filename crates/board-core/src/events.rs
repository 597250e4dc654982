//! Outbound event bus.
//!
//! The core broadcasts a small set of signals (`element:selected`,
//! `element:created`, `viewport:changed`) for toolbars and camera-focus
//! logic living outside it. Listeners get a shared reference only: they can
//! observe, never mutate the editor from inside a notification.

use crate::id::ElementId;
use crate::viewport::ViewportState;
use smallvec::SmallVec;

/// Something the core wants the outside world to know about.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// The selection changed; carries the new selection in order.
    ElementSelected(SmallVec<[ElementId; 4]>),
    /// A block was created by the user (not by undo/redo).
    ElementCreated(ElementId),
    /// Pan/zoom changed. Sent at most once per animation frame.
    ViewportChanged(ViewportState),
}

impl CanvasEvent {
    /// Wire name of the signal.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ElementSelected(_) => "element:selected",
            Self::ElementCreated(_) => "element:created",
            Self::ViewportChanged(_) => "viewport:changed",
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CanvasEvent)>;

/// Synchronous fan-out to registered listeners, in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CanvasEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: CanvasEvent) {
        log::trace!("emit {}", event.name());
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
