//! Tracing subscriber installation.

use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a formatting subscriber filtered by `RUST_LOG` (default `info`).
///
/// Only the first call does anything. If another global subscriber is
/// already set, a notice is printed to stderr and that subscriber stays.
pub fn init() {
    TRACING_INSTALLED.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let result = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_filter(filter))
            .try_init();

        if result.is_err() {
            eprintln!("waterui-rpc tracing subscriber failed to initialize");
        }
    });
}

/// Whether [`init`] has run.
#[must_use]
pub fn is_initialized() -> bool {
    TRACING_INSTALLED.is_completed()
}
