//! In-memory scripted engine used by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use sqlite_conn_actor::{
   AccessMode, EngineError, EngineFactory, EngineHandle, READ_ONLY_CODE, Row,
};

#[derive(Default)]
struct EngineState {
   log: Mutex<Vec<String>>,
   rows: Mutex<HashMap<String, Vec<Row>>>,
   failures: Mutex<HashMap<String, EngineError>>,
   fail_open: Mutex<Option<EngineError>>,
   opens: AtomicUsize,
}

/// Scripted engine: statements are logged in execution order, results and
/// failures are keyed by exact SQL text, and read-only rules are enforced
/// the way the real engine enforces them (by result code).
#[derive(Clone, Default)]
pub struct TestEngine {
   state: Arc<EngineState>,
}

impl TestEngine {
   pub fn new() -> Self {
      Self::default()
   }

   /// Script the rows returned for an exact SQL string.
   pub fn set_rows(&self, sql: &str, rows: Vec<Row>) {
      self.state.rows.lock().insert(sql.to_string(), rows);
   }

   /// Script a failure for an exact SQL string.
   pub fn fail_statement(&self, sql: &str, error: EngineError) {
      self.state.failures.lock().insert(sql.to_string(), error);
   }

   /// Make the next `open` call fail.
   pub fn fail_open(&self, error: EngineError) {
      self.state.fail_open.lock().replace(error);
   }

   /// Every statement executed so far, in execution order.
   pub fn log(&self) -> Vec<String> {
      self.state.log.lock().clone()
   }

   pub fn clear_log(&self) {
      self.state.log.lock().clear();
   }

   /// Number of handles opened so far.
   pub fn opens(&self) -> usize {
      self.state.opens.load(Ordering::SeqCst)
   }
}

impl EngineFactory for TestEngine {
   fn open(&self, read_only: bool) -> Result<Box<dyn EngineHandle>, EngineError> {
      if let Some(error) = self.state.fail_open.lock().take() {
         return Err(error);
      }
      self.state.opens.fetch_add(1, Ordering::SeqCst);
      Ok(Box::new(TestHandle {
         state: Arc::clone(&self.state),
         read_only,
      }))
   }
}

struct TestHandle {
   state: Arc<EngineState>,
   read_only: bool,
}

fn is_mutating(sql: &str) -> bool {
   let sql = sql.trim_start().to_ascii_uppercase();
   ["INSERT", "UPDATE", "DELETE", "CREATE", "DROP", "REPLACE"]
      .iter()
      .any(|kw| sql.starts_with(kw))
}

impl EngineHandle for TestHandle {
   fn select(
      &mut self,
      sql: &str,
      _args: &[JsonValue],
      access: AccessMode,
   ) -> Result<Vec<Row>, EngineError> {
      self.state.log.lock().push(sql.to_string());

      if let Some(error) = self.state.failures.lock().get(sql) {
         return Err(error.clone());
      }

      if is_mutating(sql) && (self.read_only || access == AccessMode::ReadOnly) {
         return Err(EngineError::new(
            READ_ONLY_CODE,
            "attempt to write a readonly database",
         ));
      }

      Ok(self.state.rows.lock().get(sql).cloned().unwrap_or_default())
   }
}

/// Build a row from column/value pairs.
pub fn row(pairs: &[(&str, JsonValue)]) -> Row {
   pairs
      .iter()
      .map(|(name, value)| (name.to_string(), value.clone()))
      .collect()
}
