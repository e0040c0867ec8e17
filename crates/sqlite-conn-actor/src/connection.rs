//! Caller-facing connection handle.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::OnceCell;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::Result;
use crate::change::ChangeEvent;
use crate::config::ConnectionConfig;
use crate::engine::{AccessMode, EngineFactory, Row, SqlArgs};
use crate::group::DatabaseGroup;
use crate::mutex::TimedMutex;
use crate::query::Queryable;
use crate::transaction::{ReadTransaction, WriteTransaction};
use crate::worker::Worker;

#[derive(Debug)]
struct ConnectionInner {
   config: ConnectionConfig,
   factory: Arc<dyn EngineFactory>,
   lock: TimedMutex,
   worker: OnceCell<Worker>,
   group: DatabaseGroup,
}

/// A logical connection to one database.
///
/// Cloning is cheap and shares the same worker, private lock, and group.
/// All top-level operations issued through this handle are serialized by
/// the private lock; write transactions are additionally serialized
/// across the whole [`DatabaseGroup`] by the global write lock. The
/// worker starts lazily on first use and lives for the connection's
/// lifetime.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sqlite_conn_actor::{
///    Connection, ConnectionConfig, DatabaseGroup, EngineFactory, Queryable,
/// };
///
/// # async fn example(factory: Arc<dyn EngineFactory>) -> sqlite_conn_actor::Result<()> {
/// let group = DatabaseGroup::new();
/// let conn = Connection::new(factory, &group, ConnectionConfig::default());
///
/// let total = conn
///    .write_transaction(None, |tx| async move {
///       tx.execute("INSERT INTO users (name) VALUES (?)", vec!["Alice".into()])
///          .await?;
///       tx.get("SELECT COUNT(*) AS n FROM users", vec![]).await
///    })
///    .await?;
/// # let _ = total;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Connection {
   inner: Arc<ConnectionInner>,
}

impl Connection {
   /// Create a connection in the given group.
   ///
   /// The engine handle is not opened yet; the worker starts on first
   /// use. The connection shares the group's write lock and change feed.
   pub fn new(
      factory: Arc<dyn EngineFactory>,
      group: &DatabaseGroup,
      config: ConnectionConfig,
   ) -> Self {
      Self {
         inner: Arc::new(ConnectionInner {
            config,
            factory,
            lock: TimedMutex::new("connection lock"),
            worker: OnceCell::new(),
            group: group.clone(),
         }),
      }
   }

   /// The connection's debug name, if any.
   pub fn name(&self) -> Option<&str> {
      self.inner.config.name.as_deref()
   }

   /// True if this connection was opened read-only.
   pub fn read_only(&self) -> bool {
      self.inner.config.read_only
   }

   /// Subscribe to the change feed of this connection's group. Only
   /// events published after this call are delivered.
   pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
      self.inner.group.subscribe_changes()
   }

   /// The worker for this connection, started on first call. Concurrent
   /// first uses are serialized by the cell so exactly one worker is
   /// ever spawned.
   async fn worker(&self) -> Result<&Worker> {
      self
         .inner
         .worker
         .get_or_try_init(|| async {
            debug!(name = ?self.inner.config.name, "starting worker");
            Worker::spawn(
               Arc::clone(&self.inner.factory),
               self.inner.config.read_only,
               self.inner.config.name.clone(),
            )
            .await
         })
         .await
   }

   /// Run `body` inside a read transaction.
   ///
   /// Acquires the private connection lock (bounded by `lock_timeout`),
   /// issues `BEGIN`, runs the body against a [`ReadTransaction`], and
   /// issues `END TRANSACTION` on success. On any failure from the body
   /// or from the commit, a `ROLLBACK` is attempted and the original
   /// error is re-raised. The context is closed before this call
   /// returns, on every exit path.
   pub async fn read_transaction<T, F, Fut>(
      &self,
      lock_timeout: Option<Duration>,
      body: F,
   ) -> Result<T>
   where
      F: FnOnce(ReadTransaction) -> Fut,
      Fut: Future<Output = Result<T>>,
   {
      self
         .inner
         .lock
         .lock(lock_timeout, || async move {
            let worker = self.worker().await?.clone();
            let tx = ReadTransaction::new(worker.clone());
            let outcome =
               run_transaction(&worker, "BEGIN", "END TRANSACTION", body(tx.clone())).await;
            tx.close();
            outcome
         })
         .await
   }

   /// Run `body` inside a write transaction.
   ///
   /// Nests two locks: the private connection lock, then the group's
   /// global write lock. The global lock's wait is bounded by whatever
   /// remains of `lock_timeout` after the private-lock wait, so the
   /// caller's total wait never exceeds the original budget. A timeout
   /// on the second acquisition surfaces as a `LockTimeout` naming the
   /// global write lock. Uses `BEGIN IMMEDIATE` and `COMMIT`; rollback
   /// semantics match the read path.
   pub async fn write_transaction<T, F, Fut>(
      &self,
      lock_timeout: Option<Duration>,
      body: F,
   ) -> Result<T>
   where
      F: FnOnce(WriteTransaction) -> Fut,
      Fut: Future<Output = Result<T>>,
   {
      let started = Instant::now();
      self
         .inner
         .lock
         .lock(lock_timeout, || async move {
            let remaining = lock_timeout.map(|budget| budget.saturating_sub(started.elapsed()));
            self
               .inner
               .group
               .write_lock()
               .lock(remaining, || async move {
                  let worker = self.worker().await?.clone();
                  let tx = WriteTransaction::new(worker.clone());
                  let outcome =
                     run_transaction(&worker, "BEGIN IMMEDIATE", "COMMIT", body(tx.clone())).await;
                  tx.close();
                  outcome
               })
               .await
         })
         .await
   }

   /// Execute a single mutating statement in its own write transaction.
   pub async fn execute(&self, sql: &str, args: SqlArgs) -> Result<Vec<Row>> {
      self
         .write_transaction(None, |tx| async move { tx.execute(sql, args).await })
         .await
   }
}

impl Queryable for Connection {
   /// Each read runs in its own single-statement read transaction.
   async fn get_all(&self, sql: &str, args: SqlArgs) -> Result<Vec<Row>> {
      self
         .read_transaction(None, |tx| async move { tx.get_all(sql, args).await })
         .await
   }
}

/// Run a transaction body between `begin` and `commit` statements.
///
/// On success of the body, the commit statement runs; if either the body
/// or the commit fails, a rollback is attempted and the original error is
/// what the caller sees.
async fn run_transaction<T>(
   worker: &Worker,
   begin: &str,
   commit: &str,
   body: impl Future<Output = Result<T>>,
) -> Result<T> {
   worker.select(begin, Vec::new(), AccessMode::ReadWrite).await?;

   match body.await {
      Ok(value) => {
         match worker
            .select(commit, Vec::new(), AccessMode::ReadWrite)
            .await
         {
            Ok(_) => Ok(value),
            Err(commit_err) => {
               attempt_rollback(worker, &commit_err).await;
               Err(commit_err)
            }
         }
      }
      Err(body_err) => {
         attempt_rollback(worker, &body_err).await;
         Err(body_err)
      }
   }
}

/// Best-effort rollback. A failure here never escalates: the original
/// error already dominates, so the rollback error is only logged.
async fn attempt_rollback(worker: &Worker, original: &crate::error::Error) {
   if let Err(rollback_err) = worker
      .select("ROLLBACK", Vec::new(), AccessMode::ReadWrite)
      .await
   {
      warn!(
         error = %rollback_err,
         original = %original,
         "rollback failed after transaction error"
      );
   }
}
