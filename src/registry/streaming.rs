use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::StreamExt;
use tracing::debug;
use waterui_descriptor::from_value;
use waterui_stream::try_coalesce;

use super::{Registry, RenderStream, StreamRender};
use crate::call::{ProcedurePath, StreamCaller};
use crate::config::BridgeConfig;
use crate::context::RenderContext;
use crate::error::{BridgeError, Result};

/// Renderer that subscribes to a remote procedure and yields every result.
///
/// Results are coalesced in batches of `buffer_size`: only the latest result
/// of each batch is delivered, and a partial batch is flushed when the
/// subscription ends. Errors always go through.
pub struct RemoteStreamRenderer {
    path: ProcedurePath,
    caller: Arc<dyn StreamCaller>,
    buffer_size: usize,
}

impl RemoteStreamRenderer {
    /// Creates a renderer subscribing to the procedure at `path`.
    pub fn new(path: ProcedurePath, caller: Arc<dyn StreamCaller>, buffer_size: usize) -> Self {
        Self {
            path,
            caller,
            buffer_size,
        }
    }

    /// Procedure this renderer subscribes to.
    #[must_use]
    pub const fn path(&self) -> &ProcedurePath {
        &self.path
    }
}

impl StreamRender for RemoteStreamRenderer {
    fn render_stream(&self, ctx: &RenderContext) -> RenderStream {
        let path = self.path.clone();
        let results = self
            .caller
            .subscribe(&path, ctx.to_input())
            .map(move |item| match item {
                Ok(value) => Ok(from_value(value)?),
                Err(source) => Err(BridgeError::Call {
                    path: path.clone(),
                    source,
                }),
            });
        try_coalesce(results, self.buffer_size).boxed()
    }
}

impl core::fmt::Debug for RemoteStreamRenderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteStreamRenderer")
            .field("path", &self.path)
            .field("buffer_size", &self.buffer_size)
            .finish_non_exhaustive()
    }
}

/// Registry whose renderers are remote subscriptions.
///
/// Caching and registration behave like [`SyncRegistry`](super::SyncRegistry).
pub struct StreamingRegistry {
    namespace: Option<String>,
    buffer_size: usize,
    caller: Arc<dyn StreamCaller>,
    cache: Mutex<HashMap<String, Arc<RemoteStreamRenderer>>>,
}

impl StreamingRegistry {
    /// Creates a registry subscribing through `caller`.
    pub fn new(config: &BridgeConfig, caller: Arc<dyn StreamCaller>) -> Self {
        Self {
            namespace: config.namespace.clone(),
            buffer_size: config.buffer_size,
            caller,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached renderer for `ty`, building it on first use.
    pub fn renderer(&self, ty: &str) -> Arc<RemoteStreamRenderer> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(ty.to_owned()).or_insert_with(|| {
            let path = ProcedurePath::component(self.namespace.as_deref(), ty);
            debug!(%path, buffer_size = self.buffer_size, "building remote stream renderer");
            Arc::new(RemoteStreamRenderer::new(
                path,
                Arc::clone(&self.caller),
                self.buffer_size,
            ))
        }))
    }

    /// Renders `ty` with `ctx` as a stream.
    pub fn render(&self, ty: &str, ctx: &RenderContext) -> RenderStream {
        self.renderer(ty).render_stream(ctx)
    }
}

impl Registry for StreamingRegistry {
    type Renderer = dyn StreamRender;

    fn get(&self, ty: &str) -> Option<Arc<dyn StreamRender>> {
        Some(self.renderer(ty))
    }

    fn has(&self, _ty: &str) -> bool {
        true
    }

    fn register(&self, ty: &str, _renderer: Arc<dyn StreamRender>) -> Result<()> {
        Err(BridgeError::RegistrationUnsupported { ty: ty.to_owned() })
    }
}

impl core::fmt::Debug for StreamingRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamingRegistry")
            .field("namespace", &self.namespace)
            .field("buffer_size", &self.buffer_size)
            .finish_non_exhaustive()
    }
}
