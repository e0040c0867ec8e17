//! Error types for sqlite-conn-actor

use std::time::Duration;

use thiserror::Error;

/// A failure reported by the underlying SQL engine.
///
/// The engine is an external capability; all this crate assumes about its
/// failures is a numeric result code and a message. Both cross the worker
/// boundary by value, so the caller always receives a reconstructable error
/// even though the two sides share no exception identity.
#[derive(Debug, Clone, Error)]
#[error("engine error {code}: {message}")]
pub struct EngineError {
   /// Numeric result code as reported by the engine.
   pub code: i32,

   /// Human-readable message as reported by the engine.
   pub message: String,
}

/// Result code the engine uses for "attempt to write a read-only database".
pub const READ_ONLY_CODE: i32 = 8;

impl EngineError {
   pub fn new(code: i32, message: impl Into<String>) -> Self {
      Self {
         code,
         message: message.into(),
      }
   }

   /// True when the engine rejected a mutating statement on a read-only
   /// handle or read-only-tagged query.
   pub fn is_read_only(&self) -> bool {
      self.code == READ_ONLY_CODE
   }
}

/// Errors that may occur when working with sqlite-conn-actor
#[derive(Error, Debug)]
pub enum Error {
   /// A bounded wait on a lock expired before the lock was acquired.
   /// Carries which lock timed out and the caller's original budget.
   /// Recoverable: the caller may retry with a fresh budget.
   #[error("failed to acquire {lock} within {budget:?}")]
   LockTimeout {
      lock: &'static str,
      budget: Duration,
   },

   /// Operation attempted on a transaction context after the enclosing
   /// transaction ended. Programming error; not retried.
   #[error("transaction has already been closed")]
   TransactionClosed,

   /// A mutating statement was attempted under a read-only-tagged query
   /// or on a worker opened read-only. The message clarifies the raw
   /// engine result code.
   #[error("read-only violation: {message}")]
   ReadOnlyViolation { message: String },

   /// Any other engine failure (syntax, constraint violation, I/O),
   /// propagated verbatim after rollback is attempted.
   #[error(transparent)]
   Engine(#[from] EngineError),

   /// `get` was called against a query that returned no rows.
   #[error("query returned no rows")]
   NoResult,

   /// The worker stopped before completing the request.
   #[error("database worker is no longer running")]
   WorkerGone,

   /// IO error while spawning the worker thread.
   #[error("IO error: {0}")]
   Io(#[from] std::io::Error),
}
