//! Producer tasks feeding a single output queue.

use core::pin::Pin;
use core::task::{Context, Poll};

use async_channel::Receiver;
use futures::Stream;
use pin_project_lite::pin_project;
use smol::Task;

pin_project! {
    /// Consumer side of a set of producer tasks writing into one channel.
    ///
    /// Each producer runs as its own task and owns a sender. Once every
    /// producer has finished, the channel closes and the stream ends after
    /// the queue is drained. Closure and emptiness are checked together by the
    /// channel, so a value sent just before the last sender drops is never
    /// lost.
    ///
    /// Dropping the pump cancels every producer that is still running.
    pub(crate) struct Pump<T> {
        #[pin]
        queue: Receiver<T>,
        producers: Vec<Task<()>>,
    }
}

impl<T> Pump<T> {
    pub(crate) const fn new(queue: Receiver<T>) -> Self {
        Self {
            queue,
            producers: Vec::new(),
        }
    }

    pub(crate) fn spawn<F>(&mut self, producer: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.producers.push(smol::spawn(producer));
    }

    /// Cancels every producer, then closes the queue. Values already queued
    /// are still delivered.
    pub(crate) fn close(self: Pin<&mut Self>) {
        let this = self.project();
        this.producers.clear();
        this.queue.close();
    }

    /// Number of producers still running.
    pub(crate) fn active(&self) -> usize {
        self.producers
            .iter()
            .filter(|producer| !producer.is_finished())
            .count()
    }
}

impl<T> Stream for Pump<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.project().queue.poll_next(cx)
    }
}

impl<T> core::fmt::Debug for Pump<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pump")
            .field("producers", &self.active())
            .field("queued", &self.queue.len())
            .finish()
    }
}
