use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use tracing::debug;
use waterui_descriptor::from_value;

use super::{Registry, Render, RenderFuture};
use crate::call::{Caller, ProcedurePath};
use crate::config::BridgeConfig;
use crate::context::{ChildRenderer, RenderContext};
use crate::error::{BridgeError, Result};

/// Renderer that resolves each invocation with one remote call.
pub struct RemoteRenderer {
    path: ProcedurePath,
    caller: Arc<dyn Caller>,
}

impl RemoteRenderer {
    /// Creates a renderer calling the procedure at `path`.
    pub fn new(path: ProcedurePath, caller: Arc<dyn Caller>) -> Self {
        Self { path, caller }
    }

    /// Procedure this renderer calls.
    #[must_use]
    pub const fn path(&self) -> &ProcedurePath {
        &self.path
    }
}

impl Render for RemoteRenderer {
    fn render(&self, ctx: &RenderContext) -> RenderFuture {
        let path = self.path.clone();
        let call = self.caller.call(&path, ctx.to_input());
        async move {
            let value = call
                .await
                .map_err(|source| BridgeError::Call { path, source })?;
            Ok(from_value(value)?)
        }
        .boxed()
    }
}

impl core::fmt::Debug for RemoteRenderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteRenderer")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Registry whose renderers are remote procedures, one call per render.
///
/// Renderers are built on first [`get`](Registry::get) and cached until the
/// registry is dropped. The cache is filled under its lock, so concurrent first
/// accesses for one type observe the same renderer.
pub struct SyncRegistry {
    namespace: Option<String>,
    caller: Arc<dyn Caller>,
    cache: Mutex<HashMap<String, Arc<RemoteRenderer>>>,
}

impl SyncRegistry {
    /// Creates a registry calling through `caller`.
    pub fn new(config: &BridgeConfig, caller: Arc<dyn Caller>) -> Self {
        Self {
            namespace: config.namespace.clone(),
            caller,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Procedure path used for `ty`.
    #[must_use]
    pub fn path_for(&self, ty: &str) -> ProcedurePath {
        ProcedurePath::component(self.namespace.as_deref(), ty)
    }

    /// Returns the cached renderer for `ty`, building it on first use.
    pub fn renderer(&self, ty: &str) -> Arc<RemoteRenderer> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(ty.to_owned()).or_insert_with(|| {
            let path = self.path_for(ty);
            debug!(%path, "building remote renderer");
            Arc::new(RemoteRenderer::new(path, Arc::clone(&self.caller)))
        }))
    }

    /// Renders `ty` with `ctx`.
    pub fn render(&self, ty: &str, ctx: &RenderContext) -> RenderFuture {
        self.renderer(ty).render(ctx)
    }

    /// Returns a child renderer that renders through this registry's `ty`
    /// renderer, for use with [`RenderContext::with_renderer`].
    #[must_use]
    pub fn bind(self: &Arc<Self>, ty: &str) -> ChildRenderer {
        let registry = Arc::clone(self);
        let ty = ty.to_owned();
        Arc::new(move |ctx: RenderContext| registry.render(&ty, &ctx))
    }

    /// Number of renderers built so far.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Registry for SyncRegistry {
    type Renderer = dyn Render;

    fn get(&self, ty: &str) -> Option<Arc<dyn Render>> {
        Some(self.renderer(ty))
    }

    /// Always `true`: whether the procedure exists is only known when it is
    /// called. Use [`CheckedRegistry`](super::CheckedRegistry) for an exact
    /// answer.
    fn has(&self, _ty: &str) -> bool {
        true
    }

    fn register(&self, ty: &str, _renderer: Arc<dyn Render>) -> Result<()> {
        Err(BridgeError::RegistrationUnsupported { ty: ty.to_owned() })
    }
}

impl core::fmt::Debug for SyncRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SyncRegistry")
            .field("namespace", &self.namespace)
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}
