use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::Registry;
use crate::error::Result;

/// In-process registry filled through [`register`](Registry::register).
///
/// Registering a type again replaces its renderer.
pub struct LocalRegistry<R: ?Sized> {
    renderers: Mutex<HashMap<String, Arc<R>>>,
}

impl<R: ?Sized> LocalRegistry<R> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            renderers: Mutex::new(HashMap::new()),
        }
    }

    /// Adds `renderer` for `ty`, consuming and returning the registry.
    #[must_use]
    pub fn with(self, ty: impl Into<String>, renderer: Arc<R>) -> Self {
        self.renderers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ty.into(), renderer);
        self
    }

    /// Registered type names, in no particular order.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        self.renderers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl<R: ?Sized> Default for LocalRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized + Send + Sync> Registry for LocalRegistry<R> {
    type Renderer = R;

    fn get(&self, ty: &str) -> Option<Arc<R>> {
        self.renderers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ty)
            .cloned()
    }

    fn has(&self, ty: &str) -> bool {
        self.renderers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(ty)
    }

    fn register(&self, ty: &str, renderer: Arc<R>) -> Result<()> {
        debug!(ty, "registering local renderer");
        self.renderers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ty.to_owned(), renderer);
        Ok(())
    }
}

impl<R: ?Sized> core::fmt::Debug for LocalRegistry<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let renderers = self.renderers.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("LocalRegistry")
            .field("types", &renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use serde_json::Value;
    use waterui_descriptor::Descriptor;

    use super::*;
    use crate::context::{RenderContext, Size};
    use crate::registry::{Render, RenderFuture};

    fn text(label: &'static str) -> Arc<dyn Render> {
        Arc::new(move |_: &RenderContext| -> RenderFuture {
            async move { Ok(Some(Descriptor::new("text").prop("label", label))) }.boxed()
        })
    }

    #[test]
    fn register_then_get() {
        let registry = LocalRegistry::<dyn Render>::new();
        assert!(!registry.has("text"));
        assert!(registry.get("text").is_none());

        registry.register("text", text("a")).unwrap();
        assert!(registry.has("text"));
        assert!(!registry.has("tex"));

        let ctx = RenderContext::new(Value::Null, Size::default());
        let rendered = smol::block_on(registry.get("text").unwrap().render(&ctx))
            .unwrap()
            .unwrap();
        assert_eq!(rendered.props["label"], "a");
    }

    #[test]
    fn registering_again_replaces() {
        let registry = LocalRegistry::<dyn Render>::new().with("text", text("a"));
        registry.register("text", text("b")).unwrap();
        assert_eq!(registry.types(), ["text"]);

        let ctx = RenderContext::new(Value::Null, Size::default());
        let rendered = smol::block_on(registry.get("text").unwrap().render(&ctx))
            .unwrap()
            .unwrap();
        assert_eq!(rendered.props["label"], "b");
    }
}
