//! Trailing-edge throttling of a notification stream.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::time::{Sleep, sleep};
use tokio_stream::Stream;

/// Coalesces bursts from an inner stream into at most one tick per
/// interval.
///
/// The first inner item arms a timer; items arriving while the timer is
/// armed are swallowed. When the timer fires, one `()` tick is emitted
/// (trailing edge: the tick lands a full interval after the burst began,
/// never immediately). When the inner stream ends, any armed tick is
/// still delivered before the throttled stream ends.
pub struct Throttle<S> {
   inner: S,
   interval: Duration,
   timer: Option<Pin<Box<Sleep>>>,
   inner_done: bool,
}

impl<S> Throttle<S> {
   pub fn new(inner: S, interval: Duration) -> Self {
      Self {
         inner,
         interval,
         timer: None,
         inner_done: false,
      }
   }
}

impl<S> Stream for Throttle<S>
where
   S: Stream + Unpin,
{
   type Item = ();

   fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
      let this = self.get_mut();

      // Drain everything the inner stream has ready. The first item arms
      // the timer; the rest coalesce into the armed tick.
      while !this.inner_done {
         match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(_)) => {
               if this.timer.is_none() {
                  this.timer = Some(Box::pin(sleep(this.interval)));
               }
            }
            Poll::Ready(None) => this.inner_done = true,
            Poll::Pending => break,
         }
      }

      if let Some(timer) = this.timer.as_mut() {
         match timer.as_mut().poll(cx) {
            Poll::Ready(()) => {
               this.timer = None;
               return Poll::Ready(Some(()));
            }
            Poll::Pending => return Poll::Pending,
         }
      }

      if this.inner_done {
         Poll::Ready(None)
      } else {
         Poll::Pending
      }
   }
}
