//! Canvas data model.
//!
//! A canvas is a flat, ordered list of [`Element`]s. Order is paint order:
//! the last element is drawn on top and wins hit tests. Each element
//! carries a [`BlockType`] key that the block registry resolves to a
//! renderer, default size and resize rules; the type-specific content
//! lives in an opaque JSON payload owned by that block type.

use crate::geometry::{Bounds, Point, Size};
use crate::id::{BlockType, ElementId};
use crate::viewport::ViewportState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Element ─────────────────────────────────────────────────────────────

/// A positioned, typed, resizable unit of canvas content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub payload: Value,
}

impl Element {
    pub fn new(id: ElementId, kind: BlockType, bounds: Bounds, payload: Value) -> Self {
        Self {
            id,
            kind,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            payload,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Apply every field present in `patch`.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(w) = patch.width {
            self.width = w;
        }
        if let Some(h) = patch.height {
            self.height = h;
        }
        if let Some(payload) = &patch.payload {
            self.payload = payload.clone();
        }
    }
}

// ─── Partial updates ─────────────────────────────────────────────────────

/// Partial element update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ElementPatch {
    pub fn position(p: Point) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            ..Self::default()
        }
    }

    pub fn bounds(b: Bounds) -> Self {
        Self {
            x: Some(b.x),
            y: Some(b.y),
            width: Some(b.width),
            height: Some(b.height),
            payload: None,
        }
    }

    pub fn height(h: f64) -> Self {
        Self {
            height: Some(h),
            ..Self::default()
        }
    }

    pub fn payload(payload: Value) -> Self {
        Self {
            payload: Some(payload),
            ..Self::default()
        }
    }

    /// Reject patches that would put non-finite numbers into the store.
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .flatten()
            .all(|v| v.is_finite())
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

/// What the persistence collaborator hands over at startup and reads back
/// on request. The core never initiates a save itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub viewport: ViewportState,
}
