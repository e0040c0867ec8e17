mod support;

use std::sync::Arc;

use parking_lot::Mutex;
use sqlite_conn_actor::{
   Connection, ConnectionConfig, DatabaseGroup, EngineError, Error, Queryable, WriteTransaction,
};
use support::{TestEngine, row};

fn connection(engine: &TestEngine) -> Connection {
   Connection::new(
      Arc::new(engine.clone()),
      &DatabaseGroup::new(),
      ConnectionConfig::default(),
   )
}

#[tokio::test]
async fn test_read_transaction_wraps_body_in_begin_end() {
   let engine = TestEngine::new();
   let conn = connection(&engine);

   conn
      .read_transaction(None, |tx| async move {
         tx.get_all("SELECT 1", vec![]).await?;
         Ok(())
      })
      .await
      .unwrap();

   assert_eq!(engine.log(), vec!["BEGIN", "SELECT 1", "END TRANSACTION"]);
}

#[tokio::test]
async fn test_write_transaction_uses_begin_immediate_and_commit() {
   let engine = TestEngine::new();
   let conn = connection(&engine);

   conn
      .write_transaction(None, |tx| async move {
         tx.execute("DELETE FROM users", vec![]).await?;
         Ok(())
      })
      .await
      .unwrap();

   assert_eq!(
      engine.log(),
      vec!["BEGIN IMMEDIATE", "DELETE FROM users", "COMMIT"]
   );
}

#[tokio::test]
async fn test_failing_body_triggers_rollback_and_original_error() {
   let engine = TestEngine::new();
   let conn = connection(&engine);

   // get() against an empty result set fails the body with NoResult.
   let result = conn
      .write_transaction(None, |tx| async move {
         tx.get("SELECT * FROM users WHERE id = 999", vec![]).await
      })
      .await;

   assert!(matches!(result, Err(Error::NoResult)));
   assert_eq!(
      engine.log(),
      vec![
         "BEGIN IMMEDIATE",
         "SELECT * FROM users WHERE id = 999",
         "ROLLBACK"
      ]
   );
}

#[tokio::test]
async fn test_commit_failure_rolls_back_and_surfaces_commit_error() {
   let engine = TestEngine::new();
   engine.fail_statement("COMMIT", EngineError::new(10, "disk I/O error"));
   let conn = connection(&engine);

   let result = conn
      .write_transaction(None, |tx| async move {
         tx.execute("DELETE FROM users", vec![]).await?;
         Ok(())
      })
      .await;

   match result {
      Err(Error::Engine(e)) => assert_eq!(e.code, 10),
      other => panic!("expected commit engine error, got {other:?}"),
   }
   assert_eq!(
      engine.log(),
      vec!["BEGIN IMMEDIATE", "DELETE FROM users", "COMMIT", "ROLLBACK"]
   );
}

#[tokio::test]
async fn test_rollback_failure_is_swallowed() {
   let engine = TestEngine::new();
   engine.fail_statement("SELECT boom", EngineError::new(1, "no such table: boom"));
   engine.fail_statement("ROLLBACK", EngineError::new(5, "database is locked"));
   let conn = connection(&engine);

   let result = conn
      .read_transaction(None, |tx| async move { tx.get_all("SELECT boom", vec![]).await })
      .await;

   // The caller sees the body's error, never the rollback's.
   match result {
      Err(Error::Engine(e)) => assert_eq!(e.code, 1),
      other => panic!("expected original body error, got {other:?}"),
   }
}

#[tokio::test]
async fn test_context_rejects_operations_after_transaction_returns() {
   let engine = TestEngine::new();
   let conn = connection(&engine);

   let escaped: Arc<Mutex<Option<WriteTransaction>>> = Arc::new(Mutex::new(None));
   let stash = Arc::clone(&escaped);
   conn
      .write_transaction(None, |tx| async move {
         stash.lock().replace(tx.clone());
         tx.execute("DELETE FROM users", vec![]).await?;
         Ok(())
      })
      .await
      .unwrap();

   let tx = escaped.lock().take().unwrap();
   assert!(tx.is_closed());
   assert!(matches!(
      tx.execute("DELETE FROM users", vec![]).await,
      Err(Error::TransactionClosed)
   ));
   assert!(matches!(
      tx.get_all("SELECT 1", vec![]).await,
      Err(Error::TransactionClosed)
   ));
   assert!(matches!(
      tx.get("SELECT 1", vec![]).await,
      Err(Error::TransactionClosed)
   ));
   assert!(matches!(
      tx.get_optional("SELECT 1", vec![]).await,
      Err(Error::TransactionClosed)
   ));
}

#[tokio::test]
async fn test_context_closed_even_when_body_fails() {
   let engine = TestEngine::new();
   let conn = connection(&engine);

   let escaped: Arc<Mutex<Option<WriteTransaction>>> = Arc::new(Mutex::new(None));
   let stash = Arc::clone(&escaped);
   let result = conn
      .write_transaction(None, |tx| async move {
         stash.lock().replace(tx.clone());
         tx.get("SELECT missing", vec![]).await
      })
      .await;

   assert!(matches!(result, Err(Error::NoResult)));
   assert!(escaped.lock().take().unwrap().is_closed());
}

#[tokio::test]
async fn test_reads_inside_write_transaction_stay_read_tagged() {
   let engine = TestEngine::new();
   let conn = connection(&engine);

   // A mutating statement issued through get_all carries the read-only
   // tag, so the engine rejects it even inside a write transaction.
   let result = conn
      .write_transaction(None, |tx| async move {
         tx.get_all("DELETE FROM users", vec![]).await
      })
      .await;

   assert!(matches!(result, Err(Error::ReadOnlyViolation { .. })));
}

#[tokio::test]
async fn test_write_transaction_mixes_reads_and_writes() {
   let engine = TestEngine::new();
   engine.set_rows(
      "SELECT COUNT(*) AS n FROM users",
      vec![row(&[("n", 1.into())])],
   );
   let conn = connection(&engine);

   let n = conn
      .write_transaction(None, |tx| async move {
         tx.execute("INSERT INTO users (name) VALUES (?)", vec!["Alice".into()])
            .await?;
         let count = tx.get("SELECT COUNT(*) AS n FROM users", vec![]).await?;
         Ok(count["n"].clone())
      })
      .await
      .unwrap();

   assert_eq!(n, 1);
}
