//! Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const NAMESPACE_VAR: &str = "WATERUI_RPC_NAMESPACE";
const BUFFER_SIZE_VAR: &str = "WATERUI_RPC_BUFFER_SIZE";
const PREFER_STREAMING_VAR: &str = "WATERUI_RPC_PREFER_STREAMING";

/// Settings shared by the call-backed registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Segment inserted between `components` and the type name.
    pub namespace: Option<String>,
    /// Batch size of streaming renders. `0` and `1` forward every result.
    pub buffer_size: usize,
    /// Default streaming preference for dual renders.
    pub prefer_streaming: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            buffer_size: 1,
            prefer_streaming: false,
        }
    }
}

impl BridgeConfig {
    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the streaming batch size.
    #[must_use]
    pub const fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Sets the default streaming preference.
    #[must_use]
    pub const fn with_prefer_streaming(mut self, prefer_streaming: bool) -> Self {
        self.prefer_streaming = prefer_streaming;
        self
    }

    /// Reads the configuration from the environment.
    ///
    /// Unset variables keep their defaults. An empty namespace counts as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set but cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] on malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(namespace) = lookup(NAMESPACE_VAR).filter(|value| !value.is_empty()) {
            config.namespace = Some(namespace);
        }

        if let Some(value) = lookup(BUFFER_SIZE_VAR) {
            config.buffer_size =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: BUFFER_SIZE_VAR,
                        value,
                    })?;
        }

        if let Some(value) = lookup(PREFER_STREAMING_VAR) {
            config.prefer_streaming = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: PREFER_STREAMING_VAR,
                        value,
                    });
                }
            };
        }

        Ok(config)
    }
}
