//! Block type registry.
//!
//! Every kind of block (note, image, code, ...) registers a descriptor once
//! at startup. The editor and the renderer only ever go through this
//! registry, so adding a block type never touches dispatch code.
//!
//! Unknown types are not an error at lookup time: `get` returns `None` and
//! the caller skips the element. Creating a *new* block of an unknown type
//! is an error, raised by the editor.

use crate::resize::ResizeConfig;
use board_core::geometry::{Bounds, Size};
use board_core::id::BlockType;
use board_core::model::Element;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Draws one element. Implemented by the host's rendering layer.
pub trait BlockRenderer {
    /// `screen_bounds` is the element's rectangle after the viewport
    /// transform.
    fn render(&self, element: &Element, screen_bounds: Bounds);
}

/// Builds the payload for a freshly created block.
pub type PayloadFactory = Rc<dyn Fn() -> Value>;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("block type `{0}` has no renderer")]
    MissingRenderer(BlockType),
    #[error("block type `{0}` has no default payload factory")]
    MissingDefaultPayload(BlockType),
    #[error("block type `{kind}` has invalid default size {width}x{height}")]
    InvalidDefaultSize {
        kind: BlockType,
        width: f64,
        height: f64,
    },
    #[error(
        "block type `{kind}` default size {width}x{height} is below its minimum {min_width}x{min_height}"
    )]
    DefaultSizeBelowMinimum {
        kind: BlockType,
        width: f64,
        height: f64,
        min_width: f64,
        min_height: f64,
    },
}

/// Everything the engine needs to know about one block type.
#[derive(Clone)]
pub struct BlockDescriptor {
    pub kind: BlockType,
    pub renderer: Option<Rc<dyn BlockRenderer>>,
    pub default_size: Size,
    pub create_default_payload: Option<PayloadFactory>,
    pub resize: ResizeConfig,
}

impl BlockDescriptor {
    /// Start a descriptor for `kind`. Renderer and payload factory must be
    /// supplied before registering.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: BlockType::intern(kind),
            renderer: None,
            default_size: Size::new(200.0, 120.0),
            create_default_payload: None,
            resize: ResizeConfig::default(),
        }
    }

    #[must_use]
    pub fn renderer(mut self, renderer: impl BlockRenderer + 'static) -> Self {
        self.renderer = Some(Rc::new(renderer));
        self
    }

    #[must_use]
    pub fn default_size(mut self, width: f64, height: f64) -> Self {
        self.default_size = Size::new(width, height);
        self
    }

    #[must_use]
    pub fn default_payload(mut self, factory: impl Fn() -> Value + 'static) -> Self {
        self.create_default_payload = Some(Rc::new(factory));
        self
    }

    #[must_use]
    pub fn resize(mut self, config: ResizeConfig) -> Self {
        self.resize = config;
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.renderer.is_none() {
            return Err(RegistryError::MissingRenderer(self.kind));
        }
        if self.create_default_payload.is_none() {
            return Err(RegistryError::MissingDefaultPayload(self.kind));
        }
        let Size { width, height } = self.default_size;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RegistryError::InvalidDefaultSize {
                kind: self.kind,
                width,
                height,
            });
        }
        let ResizeConfig {
            min_width,
            min_height,
            ..
        } = self.resize;
        if width < min_width || height < min_height {
            return Err(RegistryError::DefaultSizeBelowMinimum {
                kind: self.kind,
                width,
                height,
                min_width,
                min_height,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for BlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDescriptor")
            .field("kind", &self.kind)
            .field("has_renderer", &self.renderer.is_some())
            .field("default_size", &self.default_size)
            .field("resize", &self.resize)
            .finish()
    }
}

/// O(1) lookup from block type to descriptor.
#[derive(Default, Debug)]
pub struct BlockTypeRegistry {
    types: HashMap<BlockType, BlockDescriptor>,
}

impl BlockTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type. Re-registering replaces the previous
    /// descriptor (hot reload) and logs a warning.
    pub fn register(&mut self, descriptor: BlockDescriptor) -> Result<(), RegistryError> {
        descriptor.validate()?;
        let kind = descriptor.kind;
        if self.types.insert(kind, descriptor).is_some() {
            log::warn!("block type `{kind}` registered twice; replacing previous descriptor");
        } else {
            log::debug!("registered block type `{kind}`");
        }
        Ok(())
    }

    pub fn get(&self, kind: BlockType) -> Option<&BlockDescriptor> {
        self.types.get(&kind)
    }

    pub fn has(&self, kind: BlockType) -> bool {
        self.types.contains_key(&kind)
    }

    pub fn default_size(&self, kind: BlockType) -> Option<Size> {
        self.get(kind).map(|d| d.default_size)
    }

    pub fn default_creator(&self, kind: BlockType) -> Option<PayloadFactory> {
        self.get(kind).and_then(|d| d.create_default_payload.clone())
    }

    pub fn renderer(&self, kind: BlockType) -> Option<Rc<dyn BlockRenderer>> {
        self.get(kind).and_then(|d| d.renderer.clone())
    }

    pub fn resize_config(&self, kind: BlockType) -> Option<ResizeConfig> {
        self.get(kind).map(|d| d.resize)
    }

    pub fn types(&self) -> impl Iterator<Item = BlockType> + '_ {
        self.types.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
