//! Contextual actions shown in a block's toolbar / context menu.
//!
//! Actions are registered once, keyed by a unique id, and declare which
//! block types they apply to. `actions_for_block` filters, evaluates the
//! visibility and disabled predicates against an [`ActionContext`], and
//! returns a list sorted by `(group, order)`. Registration order breaks
//! ties, so the output is stable across calls.

use board_core::id::{BlockType, ElementId};
use board_core::model::Element;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// State handed to action callbacks.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// The element the menu is open for, if it still exists.
    pub element: Option<&'a Element>,
    /// Current selection, in order.
    pub selection: &'a [ElementId],
    pub zoom: f64,
}

pub type ActionHandler = Rc<dyn Fn(ElementId, BlockType, &ActionContext<'_>)>;
pub type ActionPredicate = Rc<dyn Fn(ElementId, BlockType, &ActionContext<'_>) -> bool>;

/// One registered action.
#[derive(Clone)]
pub struct ActionDescriptor {
    pub id: String,
    pub label: String,
    /// Types this action applies to. Empty means every type.
    pub types: Vec<BlockType>,
    pub group: String,
    pub order: i32,
    pub handler: ActionHandler,
    pub is_visible: Option<ActionPredicate>,
    pub is_disabled: Option<ActionPredicate>,
}

impl ActionDescriptor {
    pub fn new(
        id: &str,
        group: &str,
        order: i32,
        handler: impl Fn(ElementId, BlockType, &ActionContext<'_>) + 'static,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            types: Vec::new(),
            group: group.to_string(),
            order,
            handler: Rc::new(handler),
            is_visible: None,
            is_disabled: None,
        }
    }

    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    #[must_use]
    pub fn for_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| BlockType::intern(t)).collect();
        self
    }

    #[must_use]
    pub fn visible_when(
        mut self,
        pred: impl Fn(ElementId, BlockType, &ActionContext<'_>) -> bool + 'static,
    ) -> Self {
        self.is_visible = Some(Rc::new(pred));
        self
    }

    #[must_use]
    pub fn disabled_when(
        mut self,
        pred: impl Fn(ElementId, BlockType, &ActionContext<'_>) -> bool + 'static,
    ) -> Self {
        self.is_disabled = Some(Rc::new(pred));
        self
    }

    pub fn applies_to(&self, kind: BlockType) -> bool {
        self.types.is_empty() || self.types.contains(&kind)
    }

    fn visible(&self, id: ElementId, kind: BlockType, ctx: &ActionContext<'_>) -> bool {
        self.is_visible.as_ref().is_none_or(|p| p(id, kind, ctx))
    }

    fn disabled(&self, id: ElementId, kind: BlockType, ctx: &ActionContext<'_>) -> bool {
        self.is_disabled.as_ref().is_some_and(|p| p(id, kind, ctx))
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("id", &self.id)
            .field("types", &self.types)
            .field("group", &self.group)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// An action resolved for one block, ready to render. Serializes to the
/// JSON a web toolbar consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAction {
    pub id: String,
    pub label: String,
    pub group: String,
    pub order: i32,
    pub disabled: bool,
}

#[derive(Default, Debug)]
pub struct ActionRegistry {
    /// Registration order.
    actions: Vec<ActionDescriptor>,
    /// Action id to its position in `actions`.
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action. A duplicate id is ignored with a warning and
    /// the first registration stays; returns whether it was added.
    pub fn register(&mut self, action: ActionDescriptor) -> bool {
        if self.index.contains_key(&action.id) {
            log::warn!("action `{}` already registered; ignoring", action.id);
            return false;
        }
        log::debug!("registered action `{}`", action.id);
        self.index.insert(action.id.clone(), self.actions.len());
        self.actions.push(action);
        true
    }

    pub fn get(&self, id: &str) -> Option<&ActionDescriptor> {
        self.index.get(id).and_then(|&i| self.actions.get(i))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Visible actions for a block, sorted by group then order.
    pub fn actions_for_block(
        &self,
        kind: BlockType,
        element_id: ElementId,
        ctx: &ActionContext<'_>,
    ) -> Vec<ResolvedAction> {
        let mut out: Vec<ResolvedAction> = self
            .actions
            .iter()
            .filter(|a| a.applies_to(kind) && a.visible(element_id, kind, ctx))
            .map(|a| ResolvedAction {
                id: a.id.clone(),
                label: a.label.clone(),
                group: a.group.clone(),
                order: a.order,
                disabled: a.disabled(element_id, kind, ctx),
            })
            .collect();
        // Stable: equal (group, order) keep registration order.
        out.sort_by(|a, b| a.group.cmp(&b.group).then(a.order.cmp(&b.order)));
        out
    }

    /// Run an action's handler if it exists, applies to `kind`, is visible
    /// and is not disabled. Returns whether the handler ran.
    pub fn invoke(
        &self,
        action_id: &str,
        element_id: ElementId,
        kind: BlockType,
        ctx: &ActionContext<'_>,
    ) -> bool {
        let Some(action) = self.get(action_id) else {
            log::warn!("unknown action `{action_id}`");
            return false;
        };
        if !action.applies_to(kind)
            || !action.visible(element_id, kind, ctx)
            || action.disabled(element_id, kind, ctx)
        {
            return false;
        }
        (action.handler)(element_id, kind, ctx);
        true
    }
}
