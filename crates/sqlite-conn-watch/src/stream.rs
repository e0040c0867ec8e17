use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::broadcast;
use tokio_stream::Stream;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use sqlite_conn_actor::ChangeEvent;

/// A stream of change notifications from a connection's change feed.
///
/// Wraps a `BroadcastStream` and absorbs lag: a receiver that fell behind
/// missed real notifications, so the lag itself is surfaced as a change
/// event rather than an error. Consumers re-query and recover.
pub struct ChangeFeedStream {
   inner: BroadcastStream<ChangeEvent>,
}

impl ChangeFeedStream {
   pub fn new(rx: broadcast::Receiver<ChangeEvent>) -> Self {
      Self {
         inner: BroadcastStream::new(rx),
      }
   }
}

impl Stream for ChangeFeedStream {
   type Item = ChangeEvent;

   fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
      match Pin::new(&mut self.inner).poll_next(cx) {
         Poll::Ready(Some(Ok(change))) => Poll::Ready(Some(change)),
         Poll::Ready(Some(Err(err))) => {
            // Lagged: some notifications were dropped. Whatever they
            // were, something changed.
            warn!(error = %err, "change feed lagged; treating as a change");
            Poll::Ready(Some(ChangeEvent::default()))
         }
         Poll::Ready(None) => Poll::Ready(None),
         Poll::Pending => Poll::Pending,
      }
   }
}
