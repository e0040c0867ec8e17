//! One-shot result bridge between a worker and its callers.
//!
//! A bridge is a single-use completion slot: the worker side completes it
//! exactly once with a success value or an error, and the caller side
//! awaits it from whatever task initiated the request. The two sides share
//! no memory beyond the slot itself; errors cross as values of the
//! crate's [`Error`] enumeration, never as borrowed exception objects.

use tokio::sync::oneshot;
use tracing::trace;

use crate::Result;

/// Completing half of a result bridge. Held by the worker.
#[derive(Debug)]
pub struct Completer<T> {
   tx: oneshot::Sender<Result<T>>,
}

/// Awaiting half of a result bridge. Held by the caller.
#[derive(Debug)]
pub struct Waiter<T> {
   rx: oneshot::Receiver<Result<T>>,
}

/// Create a connected completer/waiter pair.
pub fn bridge<T>() -> (Completer<T>, Waiter<T>) {
   let (tx, rx) = oneshot::channel();
   (Completer { tx }, Waiter { rx })
}

impl<T> Completer<T> {
   /// Complete the bridge with a result.
   ///
   /// If the waiter has gone away (caller dropped the request) the result
   /// is discarded; the work was already done and there is nobody left to
   /// tell.
   pub fn complete(self, result: Result<T>) {
      if self.tx.send(result).is_err() {
         trace!("bridge completed after caller went away; result discarded");
      }
   }
}

impl<T> Waiter<T> {
   /// Await the bridged result.
   ///
   /// Suspends until the worker completes the bridge; returns immediately
   /// if it already has. A completer dropped without completing (the
   /// worker stopped) surfaces as [`Error::WorkerGone`].
   ///
   /// [`Error::WorkerGone`]: crate::Error::WorkerGone
   pub async fn wait(self) -> Result<T> {
      match self.rx.await {
         Ok(result) => result,
         Err(_) => Err(crate::Error::WorkerGone),
      }
   }
}
