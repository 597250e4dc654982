//! Undo/Redo command stack.
//!
//! Every user-visible mutation is a [`Command`] whose `execute` and `undo`
//! are exact inverses. Commands store absolute before/after values, never
//! deltas, so replaying one is idempotent.
//!
//! Gestures write to the store live and only push a command on release.
//! Consecutive move (or resize) commands on the same ids that land inside
//! the merge window are folded into the previous history entry instead of
//! creating a new one.
//!
//! History is a fixed-capacity ring with a cursor: entries before the
//! cursor are done, entries from the cursor on are undone and get dropped
//! by the next new command.

use board_core::consts::{HISTORY_CAPACITY, MERGE_WINDOW_MS};
use board_core::geometry::{Bounds, Point};
use board_core::id::ElementId;
use board_core::model::{Element, ElementPatch};
use board_core::store::ElementStore;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::time::Duration;

/// Before/after position of one element in a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMove {
    pub id: ElementId,
    pub from: Point,
    pub to: Point,
}

/// A reversible mutation of the element store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add an element; undo removes it.
    Create { element: Element },
    /// Remove an element; undo puts it back at the same paint index with
    /// the same id and payload.
    Delete { element: Element, index: usize },
    /// Reposition one or more elements as one step.
    Move { moves: SmallVec<[ElementMove; 1]> },
    Resize {
        id: ElementId,
        from: Bounds,
        to: Bounds,
    },
    UpdatePayload {
        id: ElementId,
        before: Value,
        after: Value,
    },
    /// Creates for every copy made by a duplicate.
    Duplicate { creates: Vec<Command> },
    /// Arbitrary group of commands executed in order, undone in reverse.
    Batch {
        commands: Vec<Command>,
        description: String,
    },
}

impl Command {
    /// Capture a delete for `id` as the store currently holds it.
    pub fn delete<S: ElementStore + ?Sized>(store: &S, id: ElementId) -> Option<Self> {
        let index = store.index_of(id)?;
        let element = store.get_element_by_id(id)?.clone();
        Some(Self::Delete { element, index })
    }

    /// Capture deletes for several ids as one batch. Deletes run from the
    /// topmost paint index down so every captured index stays valid.
    pub fn delete_many<S: ElementStore + ?Sized>(store: &S, ids: &[ElementId]) -> Option<Self> {
        let mut deletes: Vec<Command> = ids.iter().filter_map(|id| Self::delete(store, *id)).collect();
        deletes.sort_by_key(|c| match c {
            Self::Delete { index, .. } => std::cmp::Reverse(*index),
            _ => std::cmp::Reverse(0),
        });
        match deletes.len() {
            0 => None,
            1 => deletes.pop(),
            n => Some(Self::Batch {
                commands: deletes,
                description: format!("Delete {n} elements"),
            }),
        }
    }

    pub fn duplicate(copies: Vec<Element>) -> Self {
        Self::Duplicate {
            creates: copies
                .into_iter()
                .map(|element| Self::Create { element })
                .collect(),
        }
    }

    pub fn batch(description: &str, commands: Vec<Command>) -> Self {
        Self::Batch {
            commands,
            description: description.to_string(),
        }
    }

    pub fn execute<S: ElementStore + ?Sized>(&self, store: &mut S) {
        match self {
            Self::Create { element } => {
                if !store.add_element(element.clone()) {
                    log::debug!("create: {} already present", element.id);
                }
            }
            Self::Delete { element, .. } => {
                store.delete_element(element.id);
            }
            Self::Move { moves } => {
                for m in moves {
                    store.update_element(m.id, &ElementPatch::position(m.to));
                }
            }
            Self::Resize { id, to, .. } => {
                store.update_element(*id, &ElementPatch::bounds(*to));
            }
            Self::UpdatePayload { id, after, .. } => {
                store.update_element(*id, &ElementPatch::payload(after.clone()));
            }
            Self::Duplicate { creates: commands } | Self::Batch { commands, .. } => {
                for cmd in commands {
                    cmd.execute(store);
                }
            }
        }
    }

    pub fn undo<S: ElementStore + ?Sized>(&self, store: &mut S) {
        match self {
            Self::Create { element } => {
                store.delete_element(element.id);
            }
            Self::Delete { element, index } => {
                if !store.insert_element_at(*index, element.clone()) {
                    log::debug!("undo delete: {} already present", element.id);
                }
            }
            Self::Move { moves } => {
                for m in moves {
                    store.update_element(m.id, &ElementPatch::position(m.from));
                }
            }
            Self::Resize { id, from, .. } => {
                store.update_element(*id, &ElementPatch::bounds(*from));
            }
            Self::UpdatePayload { id, before, .. } => {
                store.update_element(*id, &ElementPatch::payload(before.clone()));
            }
            Self::Duplicate { creates: commands } | Self::Batch { commands, .. } => {
                for cmd in commands.iter().rev() {
                    cmd.undo(store);
                }
            }
        }
    }

    /// Fold `next` into `self` if it continues the same gesture: a move of
    /// the identical id set, or a resize of the same element. Only the
    /// "after" side changes; the original "before" is kept.
    pub fn merge(&mut self, next: &Command) -> bool {
        match (self, next) {
            (Self::Move { moves }, Self::Move { moves: next_moves }) => {
                if moves.len() != next_moves.len()
                    || !moves.iter().all(|m| next_moves.iter().any(|n| n.id == m.id))
                {
                    return false;
                }
                for m in moves.iter_mut() {
                    if let Some(n) = next_moves.iter().find(|n| n.id == m.id) {
                        m.to = n.to;
                    }
                }
                true
            }
            (Self::Resize { id, to, .. }, Self::Resize { id: next_id, to: next_to, .. })
                if id == next_id =>
            {
                *to = *next_to;
                true
            }
            _ => false,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Create { element } => format!("Create {}", element.kind),
            Self::Delete { element, .. } => format!("Delete {}", element.kind),
            Self::Move { moves } if moves.len() == 1 => "Move element".to_string(),
            Self::Move { moves } => format!("Move {} elements", moves.len()),
            Self::Resize { .. } => "Resize element".to_string(),
            Self::UpdatePayload { .. } => "Edit content".to_string(),
            Self::Duplicate { creates } if creates.len() == 1 => "Duplicate element".to_string(),
            Self::Duplicate { creates } => format!("Duplicate {} elements", creates.len()),
            Self::Batch { description, .. } => description.clone(),
        }
    }

    /// Every element id this command touches.
    pub fn affected_ids(&self) -> Vec<ElementId> {
        match self {
            Self::Create { element } | Self::Delete { element, .. } => vec![element.id],
            Self::Move { moves } => moves.iter().map(|m| m.id).collect(),
            Self::Resize { id, .. } | Self::UpdatePayload { id, .. } => vec![*id],
            Self::Duplicate { creates: commands } | Self::Batch { commands, .. } => {
                commands.iter().flat_map(Command::affected_ids).collect()
            }
        }
    }
}

/// One history slot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub command: Command,
    /// When the command was pushed, or last merged into.
    pub timestamp: Duration,
}

/// Fixed-capacity undo history with merge-on-continuation.
#[derive(Debug, Clone)]
pub struct CommandStack {
    entries: VecDeque<HistoryEntry>,
    /// Number of entries currently applied.
    cursor: usize,
    capacity: usize,
    merge_window: Duration,
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl CommandStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: 0,
            capacity,
            merge_window: Duration::from_millis(MERGE_WINDOW_MS),
        }
    }

    #[must_use]
    pub fn with_merge_window(mut self, window: Duration) -> Self {
        self.merge_window = window;
        self
    }

    /// Run `command` against the store and push it to history.
    pub fn execute<S: ElementStore + ?Sized>(&mut self, store: &mut S, command: Command, now: Duration) {
        command.execute(store);
        self.record(command, now);
    }

    /// Push a command whose effect is already in the store (gesture
    /// finalize). Merges into the previous entry when possible.
    pub fn record(&mut self, command: Command, now: Duration) {
        // A new action invalidates the redo branch.
        self.entries.truncate(self.cursor);

        if let Some(last) = self.entries.back_mut() {
            if now.saturating_sub(last.timestamp) <= self.merge_window && last.command.merge(&command) {
                last.timestamp = now;
                log::debug!("merged into `{}`", last.command.description());
                return;
            }
        }

        log::debug!("push `{}`", command.description());
        self.entries.push_back(HistoryEntry {
            command,
            timestamp: now,
        });
        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                log::debug!("history full; evicted `{}`", evicted.command.description());
            }
        }
        self.cursor = self.entries.len();
    }

    /// Undo the entry before the cursor. Returns its description.
    pub fn undo<S: ElementStore + ?Sized>(&mut self, store: &mut S) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let entry = &self.entries[self.cursor];
        entry.command.undo(store);
        Some(entry.command.description())
    }

    /// Re-execute the entry at the cursor. Returns its description.
    pub fn redo<S: ElementStore + ?Sized>(&mut self, store: &mut S) -> Option<String> {
        let entry = self.entries.get(self.cursor)?;
        entry.command.execute(store);
        self.cursor += 1;
        Some(entry.command.description())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.command.description())
    }

    pub fn redo_description(&self) -> Option<String> {
        self.entries.get(self.cursor).map(|e| e.command.description())
    }

    /// The command that would be undone next.
    pub fn last_command(&self) -> Option<&Command> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| &e.command)
    }

    /// The command that would be redone next.
    pub fn next_command(&self) -> Option<&Command> {
        self.entries.get(self.cursor).map(|e| &e.command)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
