//! Capability contracts implemented by underlying drivers.
//!
//! These traits describe the surface this crate consumes. An underlying
//! driver implements them; the traced wrappers delegate to them and add span
//! bracketing on top. Nothing here is specific to any wire protocol.

use async_trait::async_trait;

use crate::error::Error;
use crate::value::{NamedValue, Value};

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// Number of rows affected by the statement.
    pub rows_affected: u64,
    /// Identifier generated for an inserted row, when the driver reports one.
    pub last_insert_id: Option<i64>,
}

/// Entry point of a driver: opens connections against a data source name.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Open a connection to the data source identified by `dsn`.
    async fn open(&self, dsn: &str) -> Result<Box<dyn Connection>, Error>;
}

/// A single database connection.
///
/// Direct execution takes arguments in the named form. Drivers whose
/// prepared statements only understand the positional convention surface
/// that through [`Statement`], where [`crate::named_to_positional`] bridges
/// the gap.
#[async_trait]
pub trait Connection: Send {
    /// Prepare a statement for repeated execution.
    async fn prepare(&mut self, sql: &str) -> Result<Box<dyn Statement>, Error>;

    /// Execute a statement directly, without preparing it first.
    async fn exec(&mut self, sql: &str, args: &[NamedValue]) -> Result<ExecResult, Error>;

    /// Run a query directly and return its rows.
    async fn query(&mut self, sql: &str, args: &[NamedValue]) -> Result<Box<dyn Rows>, Error>;

    /// Start a transaction.
    async fn begin(&mut self) -> Result<Box<dyn Transaction>, Error>;
}

/// A prepared statement, using the legacy positional calling convention.
#[async_trait]
pub trait Statement: Send {
    /// Execute the statement with positional arguments.
    async fn exec(&mut self, args: &[Value]) -> Result<ExecResult, Error>;

    /// Run the query with positional arguments and return its rows.
    async fn query(&mut self, args: &[Value]) -> Result<Box<dyn Rows>, Error>;
}

/// An open transaction.
///
/// Whether a second commit or rollback is an error is the driver's call;
/// this crate adds no state tracking of its own on top.
#[async_trait]
pub trait Transaction: Send {
    async fn commit(&mut self) -> Result<(), Error>;
    async fn rollback(&mut self) -> Result<(), Error>;
}

/// A cursor over query results.
#[async_trait]
pub trait Rows: Send {
    /// Column names, in result order.
    fn columns(&self) -> &[String];

    /// Fetch the next row, or `None` once the cursor is exhausted.
    async fn next(&mut self) -> Result<Option<Vec<Value>>, Error>;
}
