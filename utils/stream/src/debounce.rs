//! Quiet-period based coalescing.

use core::pin::{Pin, pin};
use core::task::{Context, Poll};
use std::time::{Duration, Instant};

use futures::future::{self, Either};
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use smol::Timer;
use tracing::trace;

use crate::pump::Pump;

pin_project! {
    /// Stream returned by [`debounce`].
    #[must_use = "streams do nothing unless polled"]
    #[derive(Debug)]
    pub struct Debounce<T> {
        #[pin]
        pump: Pump<T>,
    }
}

/// Emits an item only after `wait` has passed without a newer one arriving.
///
/// Every arrival replaces the latest value and restarts the timer. When the
/// timer fires, the latest value is emitted and the slot clears. A value still
/// waiting when the source ends is emitted once its timer elapses, so the
/// final value of a burst is never lost and never comes early.
///
/// Production runs on a producer task that owns the source and the timer and
/// writes into a queue; the returned stream drains that queue. The stream
/// ends once the source is exhausted, the last timer has settled and the queue
/// is empty. Dropping it cancels the timer and releases the source.
pub fn debounce<S>(source: S, wait: Duration) -> Debounce<S::Item>
where
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    let (sender, receiver) = async_channel::unbounded();
    let mut pump = Pump::new(receiver);

    pump.spawn(async move {
        let mut source = pin!(source.fuse());
        let mut latest: Option<(S::Item, Instant)> = None;

        loop {
            let Some((value, deadline)) = latest.take() else {
                match source.next().await {
                    Some(value) => latest = Some((value, Instant::now() + wait)),
                    None => break,
                }
                continue;
            };

            match future::select(source.next(), Timer::at(deadline)).await {
                Either::Left((Some(newer), _)) => {
                    trace!("debounce timer restarted");
                    latest = Some((newer, Instant::now() + wait));
                }
                Either::Left((None, timer)) => {
                    timer.await;
                    if sender.send(value).await.is_err() {
                        trace!("debounce output closed");
                        return;
                    }
                    break;
                }
                Either::Right(_) => {
                    if sender.send(value).await.is_err() {
                        trace!("debounce output closed");
                        return;
                    }
                }
            }
        }
        trace!("debounce source exhausted");
    });

    Debounce { pump }
}

impl<T> Debounce<T> {
    /// Cancels the pending timer and releases the source. Values already
    /// queued are still yielded; a value waiting on its timer is discarded.
    pub fn close(self: Pin<&mut Self>) {
        self.project().pump.close();
    }
}

impl<T> Stream for Debounce<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.project().pump.poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use core::pin::pin;
    use std::time::{Duration, Instant};

    use futures::stream::{self, StreamExt};
    use smol::Timer;

    use super::debounce;

    fn timed(schedule: Vec<(u64, u32)>) -> impl futures::Stream<Item = u32> + Send + 'static {
        let start = Instant::now();
        stream::iter(schedule).then(move |(at_ms, item)| async move {
            Timer::at(start + Duration::from_millis(at_ms)).await;
            item
        })
    }

    #[test]
    fn burst_collapses_to_last_value_after_wait() {
        let wait = Duration::from_millis(40);
        smol::block_on(async {
            let start = Instant::now();
            let out: Vec<(Instant, u32)> = debounce(timed(vec![(0, 1), (5, 2), (10, 3)]), wait)
                .map(|item| (Instant::now(), item))
                .collect()
                .await;

            assert_eq!(out.len(), 1);
            assert_eq!(out[0].1, 3);
            // The last input arrived no earlier than 10ms in.
            assert!(out[0].0.duration_since(start) >= Duration::from_millis(10) + wait);
        });
    }

    #[test]
    fn separated_bursts_each_emit() {
        let out: Vec<u32> = smol::block_on(
            debounce(
                timed(vec![(0, 1), (5, 2), (120, 3), (125, 4)]),
                Duration::from_millis(30),
            )
            .collect(),
        );
        assert_eq!(out, [2, 4]);
    }

    #[test]
    fn instantly_ending_source_still_flushes_once() {
        let out: Vec<u32> =
            smol::block_on(debounce(stream::iter([1, 2, 3]), Duration::from_millis(10)).collect());
        assert_eq!(out, [3]);
    }

    #[test]
    fn empty_source_ends_without_output() {
        let out: Vec<u32> =
            smol::block_on(debounce(stream::empty::<u32>(), Duration::from_millis(10)).collect());
        assert!(out.is_empty());
    }

    #[test]
    fn consumer_pulls_one_at_a_time() {
        smol::block_on(async {
            let mut out = pin!(debounce(
                timed(vec![(0, 1), (60, 2)]),
                Duration::from_millis(20),
            ));
            assert_eq!(out.next().await, Some(1));
            Timer::after(Duration::from_millis(100)).await;
            assert_eq!(out.next().await, Some(2));
            assert_eq!(out.next().await, None);
        });
    }

    #[test]
    fn close_discards_the_waiting_value() {
        smol::block_on(async {
            let mut out = pin!(debounce(
                stream::iter([1]).chain(stream::pending()),
                Duration::from_secs(60),
            ));
            out.as_mut().close();
            assert_eq!(out.next().await, None);
        });
    }
}
