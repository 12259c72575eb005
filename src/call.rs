//! Capabilities the bridge consumes from the procedure-call layer.
//!
//! The bridge never speaks a wire protocol itself. It is handed objects that
//! can call a named procedure, subscribe to one, or report whether one exists,
//! and it builds renderers on top of them. Plain closures implement every
//! capability, which keeps test doubles short.

use core::fmt;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::error::CallError;

/// Root segment under which every component procedure lives.
pub const COMPONENTS: &str = "components";

/// Future returned by [`Caller::call`].
pub type CallFuture = BoxFuture<'static, Result<Value, CallError>>;

/// Stream returned by [`StreamCaller::subscribe`].
pub type CallStream = BoxStream<'static, Result<Value, CallError>>;

/// Ordered segments naming a remote procedure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcedurePath {
    segments: Vec<String>,
}

impl ProcedurePath {
    /// Creates a path from raw segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Path of the procedure rendering component `ty`:
    /// `components[.namespace].ty`.
    #[must_use]
    pub fn component(namespace: Option<&str>, ty: &str) -> Self {
        let mut segments = Vec::with_capacity(3);
        segments.push(COMPONENTS.to_owned());
        if let Some(namespace) = namespace {
            segments.push(namespace.to_owned());
        }
        segments.push(ty.to_owned());
        Self { segments }
    }

    /// The path segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ProcedurePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Calls a procedure and resolves to its single result.
pub trait Caller: Send + Sync {
    /// Invokes the procedure at `path` with `input`.
    fn call(&self, path: &ProcedurePath, input: Value) -> CallFuture;
}

impl<F> Caller for F
where
    F: Fn(&ProcedurePath, Value) -> CallFuture + Send + Sync,
{
    fn call(&self, path: &ProcedurePath, input: Value) -> CallFuture {
        self(path, input)
    }
}

/// Subscribes to a procedure that yields a sequence of results.
pub trait StreamCaller: Send + Sync {
    /// Opens a subscription to the procedure at `path` with `input`.
    fn subscribe(&self, path: &ProcedurePath, input: Value) -> CallStream;
}

impl<F> StreamCaller for F
where
    F: Fn(&ProcedurePath, Value) -> CallStream + Send + Sync,
{
    fn subscribe(&self, path: &ProcedurePath, input: Value) -> CallStream {
        self(path, input)
    }
}

/// Reports whether a procedure exists.
pub trait ExistenceCheck: Send + Sync {
    /// Returns `true` if a procedure is registered at `path`.
    fn exists(&self, path: &ProcedurePath) -> bool;
}

impl<F> ExistenceCheck for F
where
    F: Fn(&ProcedurePath) -> bool + Send + Sync,
{
    fn exists(&self, path: &ProcedurePath) -> bool {
        self(path)
    }
}
