//! Renderer registries.
//!
//! A registry maps a component type name to a renderer. The call-backed
//! registries build renderers lazily on first access and cache them for their
//! own lifetime:
//!
//! - [`SyncRegistry`] renders through a single call per invocation,
//! - [`StreamingRegistry`] renders through a subscription and coalesces the
//!   results,
//! - [`CheckedRegistry`] is a [`SyncRegistry`] whose `has` asks the remote
//!   side instead of answering optimistically,
//! - [`DualRegistry`] routes each render to one of the above,
//! - [`LocalRegistry`] holds renderers registered in-process.

mod checked;
mod dual;
mod local;
mod remote;
mod streaming;

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use waterui_descriptor::Descriptor;

use crate::context::RenderContext;
use crate::error::Result;

pub use checked::CheckedRegistry;
pub use dual::{DualRegistry, StreamingClassifier};
pub use local::LocalRegistry;
pub use remote::{RemoteRenderer, SyncRegistry};
pub use streaming::{RemoteStreamRenderer, StreamingRegistry};

/// Output of a single render. `None` renders nothing.
pub type RenderFuture = BoxFuture<'static, Result<Option<Descriptor>>>;

/// Output of a streaming render.
pub type RenderStream = BoxStream<'static, Result<Option<Descriptor>>>;

/// Produces one descriptor per invocation.
pub trait Render: Send + Sync {
    /// Renders `ctx`.
    fn render(&self, ctx: &RenderContext) -> RenderFuture;
}

impl<F> Render for F
where
    F: Fn(&RenderContext) -> RenderFuture + Send + Sync,
{
    fn render(&self, ctx: &RenderContext) -> RenderFuture {
        self(ctx)
    }
}

/// Produces a sequence of descriptors per invocation.
pub trait StreamRender: Send + Sync {
    /// Renders `ctx` as a stream.
    fn render_stream(&self, ctx: &RenderContext) -> RenderStream;
}

impl<F> StreamRender for F
where
    F: Fn(&RenderContext) -> RenderStream + Send + Sync,
{
    fn render_stream(&self, ctx: &RenderContext) -> RenderStream {
        self(ctx)
    }
}

/// Lookup of renderers by component type.
pub trait Registry: Send + Sync {
    /// Kind of renderer held by this registry.
    type Renderer: ?Sized + Send + Sync;

    /// Returns the renderer for `ty`, building and caching it if needed.
    fn get(&self, ty: &str) -> Option<Arc<Self::Renderer>>;

    /// Whether a renderer for `ty` is available.
    fn has(&self, ty: &str) -> bool;

    /// Adds a renderer for `ty`.
    ///
    /// # Errors
    ///
    /// Call-backed registries always fail with
    /// [`BridgeError::RegistrationUnsupported`](crate::BridgeError::RegistrationUnsupported).
    fn register(&self, ty: &str, renderer: Arc<Self::Renderer>) -> Result<()>;
}

impl<R: Registry + ?Sized> Registry for Arc<R> {
    type Renderer = R::Renderer;

    fn get(&self, ty: &str) -> Option<Arc<Self::Renderer>> {
        (**self).get(ty)
    }

    fn has(&self, ty: &str) -> bool {
        (**self).has(ty)
    }

    fn register(&self, ty: &str, renderer: Arc<Self::Renderer>) -> Result<()> {
        (**self).register(ty, renderer)
    }
}
