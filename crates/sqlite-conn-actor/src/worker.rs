//! Dedicated worker thread exclusively owning one engine handle.
//!
//! The worker is the actor at the center of this crate: an OS thread that
//! opens the engine handle inside itself, then drains an ordered command
//! inbox one command at a time. Nothing outside the thread ever touches
//! the handle, and no two commands ever run concurrently. Callers talk to
//! the worker through cheap clones of the inbox sender and await replies
//! on one-shot result bridges.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::Result;
use crate::bridge::{Completer, bridge};
use crate::engine::{AccessMode, EngineFactory, EngineHandle, Row, SqlArgs};
use crate::error::Error;

/// A command sent to a worker's inbox. Processed strictly in arrival
/// order; each carries exactly one result bridge.
enum Command {
   /// Execute a statement under the given access tag and bridge back the
   /// result rows or the error.
   Select {
      sql: String,
      args: SqlArgs,
      access: AccessMode,
      reply: Completer<Vec<Row>>,
   },

   /// Run opaque caller-supplied logic with direct, exclusive access to
   /// the engine handle. The closure completes its own bridge.
   Run(Box<dyn FnOnce(&mut dyn EngineHandle) + Send>),
}

/// Handle to a running worker. Cloning shares the same inbox.
#[derive(Debug, Clone)]
pub struct Worker {
   inbox: mpsc::UnboundedSender<Command>,
}

impl Worker {
   /// Spawn a worker thread and open its engine handle inside it.
   ///
   /// Resolves once the handle is open; an engine failure to open, or a
   /// thread spawn failure, fails the call. The worker runs until every
   /// handle to its inbox has been dropped.
   pub async fn spawn(
      factory: Arc<dyn EngineFactory>,
      read_only: bool,
      name: Option<String>,
   ) -> Result<Self> {
      let (inbox, rx) = mpsc::unbounded_channel();
      let (ready_tx, ready_rx) = oneshot::channel();

      let thread_name = name.unwrap_or_else(|| "sqlite-worker".to_string());
      std::thread::Builder::new()
         .name(thread_name)
         .spawn(move || run_loop(factory, read_only, rx, ready_tx))?;

      match ready_rx.await {
         Ok(Ok(())) => Ok(Self { inbox }),
         Ok(Err(e)) => Err(e),
         Err(_) => Err(Error::WorkerGone),
      }
   }

   /// Execute a statement on the worker and await its rows.
   pub async fn select(&self, sql: &str, args: SqlArgs, access: AccessMode) -> Result<Vec<Row>> {
      let (reply, waiter) = bridge();
      self
         .inbox
         .send(Command::Select {
            sql: sql.to_string(),
            args,
            access,
            reply,
         })
         .map_err(|_| Error::WorkerGone)?;
      waiter.wait().await
   }

   /// Run caller-supplied logic with direct access to the engine handle.
   ///
   /// Used for advanced batching where several statements must run with
   /// no interleaved commands.
   pub async fn run<T, F>(&self, f: F) -> Result<T>
   where
      T: Send + 'static,
      F: FnOnce(&mut dyn EngineHandle) -> Result<T> + Send + 'static,
   {
      let (reply, waiter) = bridge();
      self
         .inbox
         .send(Command::Run(Box::new(move |handle| {
            reply.complete(f(handle));
         })))
         .map_err(|_| Error::WorkerGone)?;
      waiter.wait().await
   }
}

/// The worker loop. Owns the engine handle for its entire life.
fn run_loop(
   factory: Arc<dyn EngineFactory>,
   read_only: bool,
   mut rx: mpsc::UnboundedReceiver<Command>,
   ready: oneshot::Sender<Result<()>>,
) {
   let mut handle = match factory.open(read_only) {
      Ok(handle) => {
         let _ = ready.send(Ok(()));
         handle
      }
      Err(e) => {
         let _ = ready.send(Err(Error::Engine(e)));
         return;
      }
   };

   debug!(read_only, "worker started");

   while let Some(command) = rx.blocking_recv() {
      match command {
         Command::Select {
            sql,
            args,
            access,
            reply,
         } => {
            trace!(sql = %sql, ?access, "executing statement");
            let result = handle
               .select(&sql, &args, access)
               .map_err(translate_engine_error);
            reply.complete(result);
         }
         Command::Run(f) => f(&mut *handle),
      }
   }

   debug!("worker stopped: all inbox handles dropped");
}

/// Translate a read-only rejection into a descriptive error; pass every
/// other engine failure through verbatim.
fn translate_engine_error(e: crate::error::EngineError) -> Error {
   if e.is_read_only() {
      Error::ReadOnlyViolation {
         message: format!(
            "attempted to write while in a read-only query or connection: {}",
            e.message
         ),
      }
   } else {
      Error::Engine(e)
   }
}
