//! Interval-based rate limiting.

use core::pin::Pin;
use core::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures::stream::{Fuse, FusedStream};
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;

pin_project! {
    /// Stream returned by [`throttle`].
    #[must_use = "streams do nothing unless polled"]
    pub struct Throttle<S: Stream> {
        #[pin]
        source: Fuse<S>,
        interval: Duration,
        last_forward: Option<Instant>,
        pending: Option<S::Item>,
    }
}

/// Forwards at most one item per `interval`.
///
/// An item arriving at least `interval` after the previous forward passes
/// through at once. Anything arriving sooner is parked in a single slot,
/// replacing whatever was parked before. When the source ends, a parked item
/// is emitted as a final trailing element regardless of the interval.
///
/// Throttling is a timestamp check; it never sleeps.
pub fn throttle<S: Stream>(source: S, interval: Duration) -> Throttle<S> {
    Throttle {
        source: source.fuse(),
        interval,
        last_forward: None,
        pending: None,
    }
}

impl<S: Stream> Throttle<S> {
    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl<S: Stream> Stream for Throttle<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        let mut this = self.project();
        loop {
            match this.source.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    let now = Instant::now();
                    let due = this
                        .last_forward
                        .is_none_or(|last| now.duration_since(last) >= *this.interval);
                    if due {
                        *this.last_forward = Some(now);
                        // A newer item has gone out; the parked one is stale.
                        *this.pending = None;
                        return Poll::Ready(Some(item));
                    }
                    *this.pending = Some(item);
                }
                Poll::Ready(None) => return Poll::Ready(this.pending.take()),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S: Stream> FusedStream for Throttle<S> {
    fn is_terminated(&self) -> bool {
        self.source.is_terminated() && self.pending.is_none()
    }
}

impl<S: Stream> core::fmt::Debug for Throttle<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.interval)
            .field("last_forward", &self.last_forward)
            .field("has_pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use futures::stream::{self, StreamExt};
    use smol::Timer;

    use super::throttle;

    fn timed(schedule: &[(u64, u32)]) -> impl futures::Stream<Item = u32> + use<> {
        let start = Instant::now();
        stream::iter(schedule.to_vec()).then(move |(at_ms, item)| async move {
            Timer::at(start + Duration::from_millis(at_ms)).await;
            item
        })
    }

    #[test]
    fn burst_keeps_first_and_trailing_latest() {
        let out: Vec<u32> = smol::block_on(
            throttle(stream::iter(1..=5), Duration::from_secs(60)).collect(),
        );
        assert_eq!(out, [1, 5]);
    }

    #[test]
    fn spaced_items_all_pass() {
        let out: Vec<u32> = smol::block_on(
            throttle(timed(&[(0, 1), (40, 2), (80, 3)]), Duration::from_millis(20)).collect(),
        );
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn forwards_are_at_least_an_interval_apart() {
        let interval = Duration::from_millis(30);
        let schedule: Vec<(u64, u32)> = (0..12_u32).map(|i| (u64::from(i) * 10, i)).collect();

        let stamped: Vec<(Instant, u32)> = smol::block_on(
            throttle(timed(&schedule), interval)
                .map(|item| (Instant::now(), item))
                .collect(),
        );

        // The final element may be the trailing flush, which ignores the interval.
        let forwarded = &stamped[..stamped.len() - 1];
        let slack = Duration::from_millis(1);
        for pair in forwarded.windows(2) {
            assert!(pair[1].0.duration_since(pair[0].0) + slack >= interval);
        }
        assert_eq!(stamped.last().map(|(_, v)| *v), Some(11));
    }

    #[test]
    fn empty_source_emits_nothing() {
        let out: Vec<u32> =
            smol::block_on(throttle(stream::empty::<u32>(), Duration::from_millis(5)).collect());
        assert!(out.is_empty());
    }
}
