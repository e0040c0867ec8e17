//! Narrow interfaces to the external SQL engine capability.
//!
//! Opening the physical database file and executing SQL are not this
//! crate's business. Both are consumed through the two traits below, and
//! everything else in the crate is written against them. The crucial
//! property: [`EngineHandle`] is deliberately **not** `Send`. A handle is
//! created inside its worker thread by [`EngineFactory::open`] and never
//! leaves it, which is how the engine's single-threaded-access requirement
//! is upheld by construction rather than by convention.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::EngineError;

/// A single decoded result row: column name to JSON value, in column order.
pub type Row = IndexMap<String, JsonValue>;

/// Positional bind arguments for a statement.
pub type SqlArgs = Vec<JsonValue>;

/// Access tag carried by every statement sent to a worker.
///
/// `ReadOnly` forbids mutation: the engine rejects mutating statements
/// under this tag with its read-only result code, which the worker then
/// translates into a descriptive error. Read queries issued from inside a
/// write transaction are still tagged `ReadOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
   ReadOnly,
   ReadWrite,
}

/// Capability for opening engine handles.
///
/// Invoked exactly once per worker, from inside the worker's own thread.
pub trait EngineFactory: Send + Sync + 'static {
   fn open(&self, read_only: bool) -> Result<Box<dyn EngineHandle>, EngineError>;
}

impl std::fmt::Debug for dyn EngineFactory {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.write_str("EngineFactory")
   }
}

/// An open engine handle. Exclusively owned by one worker thread.
///
/// Intentionally not `Send`: the type system prevents a handle from ever
/// being referenced outside the thread that created it.
pub trait EngineHandle: 'static {
   /// Execute a statement and return its result rows.
   ///
   /// The engine enforces the access tag: a mutating statement under
   /// [`AccessMode::ReadOnly`], or on a handle opened read-only, fails
   /// with the engine's read-only result code.
   fn select(
      &mut self,
      sql: &str,
      args: &[JsonValue],
      access: AccessMode,
   ) -> Result<Vec<Row>, EngineError>;
}
