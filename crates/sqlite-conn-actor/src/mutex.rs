//! FIFO-fair async mutex with bounded acquisition.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::trace;

use crate::Result;
use crate::error::Error;

/// A named, FIFO-fair exclusive lock over asynchronous operations.
///
/// Waiters queue in arrival order (tokio's mutex maintains a fair waiter
/// queue). The lock is scoped to a body closure: it is acquired before the
/// body runs and released when the body completes, whether by success or
/// by error. Acquisition may be bounded by a timeout, in which case an
/// expired wait fails with [`Error::LockTimeout`] naming this lock, and
/// the waiter leaves the queue without ever holding the lock.
///
/// Re-entrant use is not supported: calling [`lock`] again on the same
/// mutex from within a body deadlocks. That is a caller obligation.
///
/// [`lock`]: TimedMutex::lock
#[derive(Debug)]
pub struct TimedMutex {
   name: &'static str,
   inner: Mutex<()>,
}

impl TimedMutex {
   /// Create a mutex. The name identifies this lock in timeout errors.
   pub fn new(name: &'static str) -> Self {
      Self {
         name,
         inner: Mutex::new(()),
      }
   }

   /// Run `body` with exclusive ownership of the mutex.
   ///
   /// With `timeout: Some(budget)`, waits at most `budget` for the lock;
   /// on expiry the call fails with [`Error::LockTimeout`] and `body` is
   /// never run. With `None`, waits indefinitely. Errors returned by
   /// `body` release the lock and propagate unchanged.
   pub async fn lock<T, F, Fut>(&self, timeout: Option<Duration>, body: F) -> Result<T>
   where
      F: FnOnce() -> Fut,
      Fut: Future<Output = Result<T>>,
   {
      let _guard = match timeout {
         Some(budget) => match tokio::time::timeout(budget, self.inner.lock()).await {
            Ok(guard) => guard,
            Err(_) => {
               trace!(lock = self.name, ?budget, "lock acquisition timed out");
               return Err(Error::LockTimeout {
                  lock: self.name,
                  budget,
               });
            }
         },
         None => self.inner.lock().await,
      };

      body().await
   }

   /// True if the mutex is currently held. Diagnostics only: the answer
   /// may be stale by the time the caller observes it.
   pub fn locked(&self) -> bool {
      self.inner.try_lock().is_err()
   }

   /// The name this lock reports in timeout errors.
   pub fn name(&self) -> &'static str {
      self.name
   }
}
