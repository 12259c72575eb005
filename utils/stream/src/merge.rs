//! Arrival-order merging of independent streams.

use core::pin::{Pin, pin};
use core::task::{Context, Poll};

use futures::{Stream, StreamExt};
use pin_project_lite::pin_project;
use tracing::trace;

use crate::pump::Pump;

pin_project! {
    /// Stream returned by [`merge`].
    #[must_use = "streams do nothing unless polled"]
    #[derive(Debug)]
    pub struct Merge<T> {
        #[pin]
        pump: Pump<T>,
    }
}

/// Merges `sources` into one stream that yields items as they arrive.
///
/// Every source gets its own worker task that pulls one item at a time and
/// pushes it into a shared queue, so a source never has two pulls in flight
/// and its own items keep their relative order. No order is implied across
/// sources. The merged stream ends once every source is exhausted.
///
/// Dropping the merged stream cancels every worker and releases the sources.
pub fn merge<I, S>(sources: I) -> Merge<S::Item>
where
    I: IntoIterator<Item = S>,
    S: Stream + Send + 'static,
    S::Item: Send + 'static,
{
    let sources: Vec<S> = sources.into_iter().collect();
    let (sender, receiver) = async_channel::bounded(sources.len().max(1));
    let mut pump = Pump::new(receiver);

    for (index, source) in sources.into_iter().enumerate() {
        let sender = sender.clone();
        pump.spawn(async move {
            let mut source = pin!(source);
            while let Some(item) = source.next().await {
                if sender.send(item).await.is_err() {
                    trace!(index, "merge output closed, releasing source");
                    return;
                }
            }
            trace!(index, "merge source exhausted");
        });
    }

    Merge { pump }
}

impl<T> Merge<T> {
    /// Stops every worker and releases the sources. Items already queued are
    /// still yielded before the stream ends.
    pub fn close(self: Pin<&mut Self>) {
        self.project().pump.close();
    }

    /// Number of sources that have not finished yet.
    #[must_use]
    pub fn active_sources(&self) -> usize {
        self.pump.active()
    }
}

impl<T> Stream for Merge<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.project().pump.poll_next(cx)
    }
}
