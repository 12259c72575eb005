//! Stream combinators for asynchronous render output.
//!
//! Remote renderers can produce many descriptors over time. These adapters
//! decide how those outputs are combined and paced before they reach the
//! hydrator:
//!
//! - [`merge`] interleaves several streams in arrival order,
//! - [`throttle`] caps the forward rate with a trailing flush,
//! - [`debounce`] waits for a quiet period and emits the latest value,
//! - [`coalesce`] collapses fixed-size batches into their latest item.
//!
//! Per-source order is preserved by every adapter. Timers come from
//! [`smol::Timer`], and the task-backed adapters ([`merge`], [`debounce`])
//! run their producers on smol's global executor, so they work under any
//! executor that polls them. Dropping a stream cancels its producers, timers
//! and sources.

mod coalesce;
mod debounce;
mod ext;
mod merge;
mod pump;
mod throttle;

pub use coalesce::{Coalesce, coalesce, try_coalesce};
pub use debounce::{Debounce, debounce};
pub use ext::PacingExt;
pub use merge::{Merge, merge};
pub use throttle::{Throttle, throttle};
