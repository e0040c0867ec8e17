//! Transaction contexts bound to one open transaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Result;
use crate::engine::{AccessMode, Row, SqlArgs};
use crate::error::Error;
use crate::query::Queryable;
use crate::worker::Worker;

#[derive(Debug)]
struct TxShared {
   worker: Worker,
   closed: AtomicBool,
}

impl TxShared {
   fn ensure_open(&self) -> Result<()> {
      if self.closed.load(Ordering::SeqCst) {
         return Err(Error::TransactionClosed);
      }
      Ok(())
   }
}

/// Context for one open read transaction.
///
/// Mediates every statement sent to the worker while the transaction is
/// open. Clones share one closed flag; the connection closes the context
/// on every exit path of the enclosing transaction call, after which all
/// operations fail with [`Error::TransactionClosed`]. Closing is
/// monotonic: a context is never reopened.
#[derive(Debug, Clone)]
pub struct ReadTransaction {
   shared: Arc<TxShared>,
}

impl ReadTransaction {
   pub(crate) fn new(worker: Worker) -> Self {
      Self {
         shared: Arc::new(TxShared {
            worker,
            closed: AtomicBool::new(false),
         }),
      }
   }

   pub(crate) fn close(&self) {
      self.shared.closed.store(true, Ordering::SeqCst);
   }

   /// True once the enclosing transaction has ended.
   pub fn is_closed(&self) -> bool {
      self.shared.closed.load(Ordering::SeqCst)
   }
}

impl Queryable for ReadTransaction {
   async fn get_all(&self, sql: &str, args: SqlArgs) -> Result<Vec<Row>> {
      self.shared.ensure_open()?;
      self
         .shared
         .worker
         .select(sql, args, AccessMode::ReadOnly)
         .await
   }
}

/// Context for one open write transaction.
///
/// Everything a [`ReadTransaction`] offers, plus [`execute`] for mutating
/// statements. Read queries issued through this context are still tagged
/// read-only; the engine is what decides whether a statement mutates.
///
/// [`execute`]: WriteTransaction::execute
#[derive(Debug, Clone)]
pub struct WriteTransaction {
   read: ReadTransaction,
}

impl WriteTransaction {
   pub(crate) fn new(worker: Worker) -> Self {
      Self {
         read: ReadTransaction::new(worker),
      }
   }

   pub(crate) fn close(&self) {
      self.read.close();
   }

   /// True once the enclosing transaction has ended.
   pub fn is_closed(&self) -> bool {
      self.read.is_closed()
   }

   /// Execute a mutating statement inside this transaction.
   pub async fn execute(&self, sql: &str, args: SqlArgs) -> Result<Vec<Row>> {
      self.read.shared.ensure_open()?;
      self
         .read
         .shared
         .worker
         .select(sql, args, AccessMode::ReadWrite)
         .await
   }
}

impl Queryable for WriteTransaction {
   async fn get_all(&self, sql: &str, args: SqlArgs) -> Result<Vec<Row>> {
      self.read.get_all(sql, args).await
   }
}
