#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod call;
pub mod config;
pub mod context;
pub mod error;
pub mod hydrate;
pub mod info;
pub mod logging;
pub mod registry;

#[doc(inline)]
pub use waterui_descriptor as descriptor;
#[doc(inline)]
pub use waterui_stream as stream;

pub use call::{Caller, ExistenceCheck, ProcedurePath, StreamCaller};
pub use config::BridgeConfig;
pub use context::{ChildRenderer, RenderContext, Size};
pub use error::{BridgeError, CallError, ConfigError, Result};
pub use hydrate::{ElementFactory, Hydrator, NativeFactory, NativeHydrator};
pub use registry::{
    CheckedRegistry, DualRegistry, LocalRegistry, Registry, Render, RenderFuture, RenderStream,
    StreamRender, StreamingRegistry, SyncRegistry,
};
pub use waterui_descriptor::Descriptor;
