use std::sync::Arc;

use super::{Registry, Render, SyncRegistry};
use crate::call::{Caller, ExistenceCheck};
use crate::config::BridgeConfig;
use crate::error::Result;

/// A [`SyncRegistry`] that answers [`has`](Registry::has) by asking the
/// remote side whether the component's procedure exists.
pub struct CheckedRegistry {
    inner: SyncRegistry,
    exists: Arc<dyn ExistenceCheck>,
}

impl CheckedRegistry {
    /// Creates a registry calling through `caller` and checking through `exists`.
    pub fn new(
        config: &BridgeConfig,
        caller: Arc<dyn Caller>,
        exists: Arc<dyn ExistenceCheck>,
    ) -> Self {
        Self {
            inner: SyncRegistry::new(config, caller),
            exists,
        }
    }

    /// The wrapped registry.
    #[must_use]
    pub const fn inner(&self) -> &SyncRegistry {
        &self.inner
    }
}

impl Registry for CheckedRegistry {
    type Renderer = dyn Render;

    fn get(&self, ty: &str) -> Option<Arc<dyn Render>> {
        self.inner.get(ty)
    }

    fn has(&self, ty: &str) -> bool {
        self.exists.exists(&self.inner.path_for(ty))
    }

    fn register(&self, ty: &str, renderer: Arc<dyn Render>) -> Result<()> {
        self.inner.register(ty, renderer)
    }
}

impl core::fmt::Debug for CheckedRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CheckedRegistry")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
