//! Per-invocation render context.

use core::fmt;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::BridgeError;
use crate::registry::RenderFuture;

/// Space offered to a component, in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Renders a child context, typically by routing it back into a registry.
pub type ChildRenderer = Arc<dyn Fn(RenderContext) -> RenderFuture + Send + Sync>;

/// Input of a single render invocation.
///
/// A context is created for one node and never changes afterwards; descending
/// into a child produces a new context with `depth + 1` and the child's
/// segment appended to `path`.
#[derive(Clone)]
pub struct RenderContext {
    data: Value,
    size: Size,
    path: String,
    depth: u32,
    renderer: Option<ChildRenderer>,
}

impl RenderContext {
    /// Creates a root context.
    #[must_use]
    pub fn new(data: Value, size: Size) -> Self {
        Self {
            data,
            size,
            path: String::new(),
            depth: 0,
            renderer: None,
        }
    }

    /// Attaches the renderer used by [`render`](Self::render).
    #[must_use]
    pub fn with_renderer(mut self, renderer: ChildRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Data handed to the component.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Space offered to the component.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Slash-separated path from the root; empty at the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Distance from the root; zero at the root.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Derives the context of a child.
    #[must_use]
    pub fn child(&self, data: Value, size: Size, segment: &str) -> Self {
        let path = if self.path.is_empty() {
            segment.to_owned()
        } else {
            format!("{}/{segment}", self.path)
        };
        Self {
            data,
            size,
            path,
            depth: self.depth + 1,
            renderer: self.renderer.clone(),
        }
    }

    /// Renders a child through the attached renderer.
    ///
    /// Fails with [`BridgeError::NoChildRenderer`] when none is attached.
    pub fn render(&self, data: Value, size: Size, segment: &str) -> RenderFuture {
        let child = self.child(data, size, segment);
        match &self.renderer {
            Some(renderer) => renderer(child),
            None => {
                let path = child.path;
                async move { Err(BridgeError::NoChildRenderer(path)) }.boxed()
            }
        }
    }

    /// The call input for this context: `{ data, size, path, depth }`.
    #[must_use]
    pub fn to_input(&self) -> Value {
        json!({
            "data": self.data,
            "size": self.size,
            "path": self.path,
            "depth": self.depth,
        })
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("data", &self.data)
            .field("size", &self.size)
            .field("path", &self.path)
            .field("depth", &self.depth)
            .field("has_renderer", &self.renderer.is_some())
            .finish()
    }
}
