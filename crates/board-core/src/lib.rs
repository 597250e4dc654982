//! Core data model for the infinite canvas.
//!
//! | Module | Role |
//! |--------|------|
//! | [`id`] | Interned element ids and block type keys |
//! | [`geometry`] | Points, sizes, bounds and the intersection predicate |
//! | [`model`] | Elements, partial updates, persisted snapshots |
//! | [`store`] | The `ElementStore` contract and `MemoryStore` |
//! | [`viewport`] | Pan/zoom transform and screen ↔ world conversion |
//! | [`events`] | Outbound event bus |
//! | [`frame`] | Per-animation-frame coalescing helpers |
//! | [`clock`] | Monotonic time source |
//! | [`config`] | Editor tunables |
//! | [`consts`] | Default values for the tunables |

pub mod clock;
pub mod config;
pub mod consts;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod id;
pub mod model;
pub mod store;
pub mod viewport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EditorConfig};
pub use events::{CanvasEvent, EventBus, SubscriptionId};
pub use frame::{FrameCoalescer, FrameThrottle};
pub use geometry::{Bounds, Point, Size};
pub use id::{BlockType, ElementId};
pub use model::{CanvasSnapshot, Element, ElementPatch};
pub use store::{ElementStore, MemoryStore};
pub use viewport::{ViewportState, ViewportTransform};
