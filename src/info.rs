//! Informational procedures exposed by the bridge itself.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::call::{CallFuture, Caller, ProcedurePath};
use crate::error::CallError;

/// Root segment of the bridge's own procedures.
pub const BRIDGE: &str = "bridge";

/// Name, version and description of this bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeInfo {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// One-line package description.
    pub description: String,
}

/// Liveness report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"` while the bridge answers.
    pub status: String,
    /// Unix time of the report, in milliseconds.
    pub timestamp: i64,
}

/// Describes this build of the bridge.
#[must_use]
pub fn info() -> BridgeInfo {
    BridgeInfo {
        name: env!("CARGO_PKG_NAME").to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        description: env!("CARGO_PKG_DESCRIPTION").to_owned(),
    }
}

/// Reports the bridge as healthy at the current time.
#[must_use]
pub fn health() -> Health {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    Health {
        status: "ok".to_owned(),
        timestamp: i64::try_from(millis).unwrap_or(i64::MAX),
    }
}

/// A [`Caller`] serving `bridge.info` and `bridge.health`.
///
/// Every other path fails with [`CallError::NotFound`], so it can sit in front
/// of another caller as a first lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProcedures;

impl BuiltinProcedures {
    fn answer(path: &ProcedurePath) -> Result<Value, CallError> {
        let encoded = match path.segments() {
            [root, name] if root == BRIDGE && name == "info" => serde_json::to_value(info()),
            [root, name] if root == BRIDGE && name == "health" => serde_json::to_value(health()),
            _ => return Err(CallError::NotFound(path.to_string())),
        };
        encoded.map_err(|err| CallError::Remote(err.to_string()))
    }
}

impl Caller for BuiltinProcedures {
    fn call(&self, path: &ProcedurePath, _input: Value) -> CallFuture {
        let answer = Self::answer(path);
        async move { answer }.boxed()
    }
}
