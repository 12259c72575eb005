use std::time::Duration;

use futures::Stream;

use crate::{Coalesce, Debounce, Throttle, coalesce, debounce, throttle};

/// Pacing adapters available on every [`Stream`].
pub trait PacingExt: Stream + Sized {
    /// See [`throttle`](crate::throttle()).
    fn throttle(self, interval: Duration) -> Throttle<Self> {
        throttle(self, interval)
    }

    /// See [`debounce`](crate::debounce()).
    fn debounce(self, wait: Duration) -> Debounce<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
    {
        debounce(self, wait)
    }

    /// See [`coalesce`](crate::coalesce()).
    fn coalesce(self, size: usize) -> Coalesce<Self> {
        coalesce(self, size)
    }
}

impl<S: Stream> PacingExt for S {}
