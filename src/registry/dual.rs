use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::{StreamExt, stream};
use tracing::debug;

use super::{Registry, Render, RenderStream, StreamRender, StreamingRegistry, SyncRegistry};
use crate::call::{Caller, StreamCaller};
use crate::config::BridgeConfig;
use crate::context::RenderContext;
use crate::error::{BridgeError, Result};

/// Decides whether a component type should be rendered as a stream.
pub type StreamingClassifier = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One render entry point over a sync and a streaming registry.
///
/// A render streams when the caller or the registry's default prefers
/// streaming, or when the classifier marks the type as streaming. Otherwise
/// the sync renderer produces exactly one item. A render that should stream but finds no streaming renderer falls
/// back to the sync one, and only a type unknown to both fails.
pub struct DualRegistry<S, T> {
    sync: S,
    streaming: T,
    classifier: Option<StreamingClassifier>,
    classified: Mutex<HashMap<String, bool>>,
    prefer_streaming: bool,
}

impl<S, T> DualRegistry<S, T>
where
    S: Registry<Renderer = dyn Render>,
    T: Registry<Renderer = dyn StreamRender>,
{
    /// Composes `sync` and `streaming`.
    pub fn new(sync: S, streaming: T) -> Self {
        Self {
            sync,
            streaming,
            classifier: None,
            classified: Mutex::new(HashMap::new()),
            prefer_streaming: false,
        }
    }

    /// Sets the default streaming preference, combined with each caller's.
    #[must_use]
    pub const fn with_prefer_streaming(mut self, prefer_streaming: bool) -> Self {
        self.prefer_streaming = prefer_streaming;
        self
    }

    /// Sets the classifier consulted for types the caller does not force.
    ///
    /// Answers are cached per type for the lifetime of the registry.
    #[must_use]
    pub fn with_classifier(mut self, classifier: StreamingClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// The sync registry.
    pub const fn sync(&self) -> &S {
        &self.sync
    }

    /// The streaming registry.
    pub const fn streaming(&self) -> &T {
        &self.streaming
    }

    /// Whether the classifier marks `ty` as streaming.
    pub fn is_streaming(&self, ty: &str) -> bool {
        let Some(classifier) = &self.classifier else {
            return false;
        };
        let mut classified = self
            .classified
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *classified
            .entry(ty.to_owned())
            .or_insert_with(|| classifier(ty))
    }

    /// Renders `ty` with `ctx`.
    ///
    /// # Errors
    ///
    /// Fails with [`BridgeError::NoRenderer`] when neither registry has a
    /// renderer for `ty`. Render failures are delivered through the stream.
    pub fn render(
        &self,
        ty: &str,
        ctx: &RenderContext,
        prefer_streaming: bool,
    ) -> Result<RenderStream> {
        let prefer_streaming = prefer_streaming || self.prefer_streaming;
        if prefer_streaming || self.is_streaming(ty) {
            if let Some(renderer) = self.streaming.get(ty) {
                debug!(ty, prefer_streaming, "rendering as stream");
                return Ok(renderer.render_stream(ctx));
            }
            debug!(ty, "no streaming renderer, falling back to sync");
        }

        let renderer = self
            .sync
            .get(ty)
            .ok_or_else(|| BridgeError::NoRenderer(ty.to_owned()))?;
        debug!(ty, "rendering once");
        Ok(stream::once(renderer.render(ctx)).boxed())
    }
}

impl DualRegistry<SyncRegistry, StreamingRegistry> {
    /// Composes the two call-backed registries sharing `config`, including
    /// its streaming preference.
    pub fn remote(
        config: &BridgeConfig,
        caller: Arc<dyn Caller>,
        stream_caller: Arc<dyn StreamCaller>,
    ) -> Self {
        Self::new(
            SyncRegistry::new(config, caller),
            StreamingRegistry::new(config, stream_caller),
        )
        .with_prefer_streaming(config.prefer_streaming)
    }
}

impl<S: core::fmt::Debug, T: core::fmt::Debug> core::fmt::Debug for DualRegistry<S, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DualRegistry")
            .field("sync", &self.sync)
            .field("streaming", &self.streaming)
            .field("has_classifier", &self.classifier.is_some())
            .field("prefer_streaming", &self.prefer_streaming)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use serde_json::Value;
    use waterui_descriptor::Descriptor;

    use super::*;
    use crate::context::Size;
    use crate::registry::testing::{counting_subscriber, echo_caller};
    use crate::registry::{LocalRegistry, RenderFuture};

    fn ctx() -> RenderContext {
        RenderContext::new(Value::Null, Size::default())
    }

    fn collect(stream: RenderStream) -> Vec<Descriptor> {
        smol::block_on(stream.collect::<Vec<_>>())
            .into_iter()
            .map(|item| item.unwrap().unwrap())
            .collect()
    }

    fn remote() -> DualRegistry<SyncRegistry, StreamingRegistry> {
        let (caller, _) = echo_caller();
        DualRegistry::remote(
            &BridgeConfig::default(),
            Arc::new(caller),
            Arc::new(counting_subscriber(3)),
        )
    }

    #[test]
    fn sync_path_emits_exactly_one_item() {
        let items = collect(remote().render("card", &ctx(), false).unwrap());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].ty, "card");
    }

    #[test]
    fn preference_selects_streaming() {
        let items = collect(remote().render("card", &ctx(), true).unwrap());
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.ty == "frame"));
    }

    #[test]
    fn configured_preference_streams_by_default() {
        let (caller, _) = echo_caller();
        let config = BridgeConfig::default().with_prefer_streaming(true);
        let registry = DualRegistry::remote(
            &config,
            Arc::new(caller),
            Arc::new(counting_subscriber(3)),
        );

        let items = collect(registry.render("card", &ctx(), false).unwrap());
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.ty == "frame"));

        let once = collect(remote().render("card", &ctx(), false).unwrap());
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn classifier_selects_streaming_and_is_cached() {
        let asked = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&asked);
        let registry = remote().with_classifier(Arc::new(move |ty: &str| {
            seen.fetch_add(1, Ordering::SeqCst);
            ty == "ticker"
        }));

        assert_eq!(collect(registry.render("ticker", &ctx(), false).unwrap()).len(), 3);
        assert_eq!(collect(registry.render("ticker", &ctx(), false).unwrap()).len(), 3);
        assert_eq!(collect(registry.render("card", &ctx(), false).unwrap()).len(), 1);
        assert_eq!(asked.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_stream_renderer_falls_back_to_sync() {
        let sync = LocalRegistry::<dyn Render>::new().with(
            "card",
            Arc::new(|_: &RenderContext| -> RenderFuture {
                async { Ok(Some(Descriptor::new("card"))) }.boxed()
            }),
        );
        let registry = DualRegistry::new(sync, LocalRegistry::<dyn StreamRender>::new());

        let items = collect(registry.render("card", &ctx(), true).unwrap());
        assert_eq!(items, [Descriptor::new("card")]);
    }

    #[test]
    fn unknown_to_both_is_an_error() {
        let registry = DualRegistry::new(
            LocalRegistry::<dyn Render>::new(),
            LocalRegistry::<dyn StreamRender>::new(),
        );
        let Err(err) = registry.render("ghost", &ctx(), true) else {
            panic!("expected an error");
        };
        assert!(matches!(err, BridgeError::NoRenderer(ty) if ty == "ghost"));
    }
}
