//! Latest-wins batching.

use core::pin::Pin;
use core::task::{Context, Poll};

use futures::stream::{Fuse, FusedStream};
use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;

pin_project! {
    /// Stream returned by [`coalesce`] and [`try_coalesce`].
    #[must_use = "streams do nothing unless polled"]
    pub struct Coalesce<S: Stream> {
        #[pin]
        source: Fuse<S>,
        size: usize,
        buffered: usize,
        latest: Option<S::Item>,
        deferred: Option<S::Item>,
        urgent: fn(&S::Item) -> bool,
    }
}

/// Collapses every batch of `size` items into the most recent one.
///
/// With `size <= 1` every item passes straight through. Otherwise items are
/// counted into a batch; when the batch is full its latest item is emitted and
/// the rest are discarded. A partial batch left when the source ends is
/// flushed as its latest item.
pub fn coalesce<S: Stream>(source: S, size: usize) -> Coalesce<S> {
    Coalesce {
        source: source.fuse(),
        size,
        buffered: 0,
        latest: None,
        deferred: None,
        urgent: |_| false,
    }
}

/// Like [`coalesce`], but errors are never discarded.
///
/// An `Err` item ends the current batch: the batch's latest value goes out
/// first, then the error.
pub fn try_coalesce<S, T, E>(source: S, size: usize) -> Coalesce<S>
where
    S: Stream<Item = Result<T, E>>,
{
    Coalesce {
        urgent: Result::is_err,
        ..coalesce(source, size)
    }
}

impl<S: Stream> Stream for Coalesce<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        let mut this = self.project();

        if let Some(item) = this.deferred.take() {
            return Poll::Ready(Some(item));
        }
        if *this.size <= 1 {
            return this.source.poll_next(cx);
        }

        loop {
            match this.source.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    if (*this.urgent)(&item) {
                        *this.buffered = 0;
                        return match this.latest.take() {
                            Some(latest) => {
                                *this.deferred = Some(item);
                                Poll::Ready(Some(latest))
                            }
                            None => Poll::Ready(Some(item)),
                        };
                    }
                    *this.latest = Some(item);
                    *this.buffered += 1;
                    if *this.buffered >= *this.size {
                        *this.buffered = 0;
                        return Poll::Ready(this.latest.take());
                    }
                }
                Poll::Ready(None) => {
                    *this.buffered = 0;
                    return Poll::Ready(this.latest.take());
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S: Stream> FusedStream for Coalesce<S> {
    fn is_terminated(&self) -> bool {
        self.source.is_terminated() && self.latest.is_none() && self.deferred.is_none()
    }
}

impl<S: Stream> core::fmt::Debug for Coalesce<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Coalesce")
            .field("size", &self.size)
            .field("buffered", &self.buffered)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use futures::stream::{self, StreamExt};

    use super::{coalesce, try_coalesce};

    fn run<S: futures::Stream>(stream: S) -> Vec<S::Item> {
        smol::block_on(stream.collect())
    }

    #[test]
    fn size_one_or_zero_forwards_everything() {
        assert_eq!(run(coalesce(stream::iter(1..=4), 1)), [1, 2, 3, 4]);
        assert_eq!(run(coalesce(stream::iter(1..=4), 0)), [1, 2, 3, 4]);
    }

    #[test]
    fn full_batches_emit_their_latest() {
        assert_eq!(run(coalesce(stream::iter(1..=6), 3)), [3, 6]);
    }

    #[test]
    fn remainder_is_flushed_at_end() {
        assert_eq!(run(coalesce(stream::iter(1..=7), 3)), [3, 6, 7]);
        assert_eq!(run(coalesce(stream::iter(1..=2), 5)), [2]);
    }

    #[test]
    fn errors_cut_the_batch_in_order() {
        let items: Vec<Result<u32, &str>> = vec![Ok(1), Ok(2), Err("boom"), Ok(3), Ok(4), Ok(5)];
        assert_eq!(
            run(try_coalesce(stream::iter(items), 3)),
            [Ok(2), Err("boom"), Ok(5)]
        );
    }

    #[test]
    fn leading_error_passes_alone() {
        let items: Vec<Result<u32, &str>> = vec![Err("first"), Ok(1)];
        assert_eq!(run(try_coalesce(stream::iter(items), 4)), [Err("first"), Ok(1)]);
    }
}
