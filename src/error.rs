//! Error types for the bridge.

use thiserror::Error;
use waterui_descriptor::DescriptorError;

use crate::call::ProcedurePath;

/// Failure reported by a call capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    /// No procedure is registered under the requested path.
    #[error("procedure `{0}` does not exist")]
    NotFound(String),
    /// The procedure ran and reported a failure.
    #[error("procedure failed: {0}")]
    Remote(String),
    /// The call never reached the procedure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors surfaced by registries and renderers.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Call-backed registries resolve renderers remotely and refuse local
    /// registrations.
    #[error("cannot register `{ty}`: renderers of this registry are backed by remote calls")]
    RegistrationUnsupported {
        /// Type the caller tried to register.
        ty: String,
    },
    /// No renderer exists for the requested type.
    #[error("no renderer for type `{0}`")]
    NoRenderer(String),
    /// A render context was asked to render a child without a bound renderer.
    #[error("render context at `{0}` has no child renderer")]
    NoChildRenderer(String),
    /// The underlying call failed.
    #[error("call to `{path}` failed")]
    Call {
        /// Procedure that was invoked.
        path: ProcedurePath,
        /// What went wrong.
        #[source]
        source: CallError,
    },
    /// The procedure answered with something that is not a descriptor.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Errors raised while loading [`BridgeConfig`](crate::BridgeConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be parsed.
    #[error("invalid value `{value}` for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Result alias for bridge operations.
pub type Result<T, E = BridgeError> = core::result::Result<T, E>;
