//! Traced prepared-statement wrapper.

use std::fmt;
use std::sync::Arc;

use tracing::Instrument;

use crate::driver::{ExecResult, Rows, Statement};
use crate::error::Error;
use crate::tracer::{Operation, OperationKind, Tracer};
use crate::value::{named_to_positional, NamedValue};

/// A prepared statement with span-bracketed execution.
///
/// The underlying [`Statement`] contract is the legacy positional one, so
/// arguments go through [`named_to_positional`] first: a named parameter is
/// rejected with [`Error::Unsupported`] before the underlying driver is even
/// called. The span still closes, with that error recorded.
pub struct TracedStatement {
    inner: Box<dyn Statement>,
    sql: String,
    tracer: Arc<Tracer>,
}

impl TracedStatement {
    pub(crate) fn new(inner: Box<dyn Statement>, sql: String, tracer: Arc<Tracer>) -> Self {
        Self { inner, sql, tracer }
    }

    /// The statement text this statement was prepared from.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Execute the prepared statement.
    pub async fn exec(&mut self, args: &[NamedValue]) -> Result<ExecResult, Error> {
        let span = self
            .tracer
            .new_span(&Operation::new(OperationKind::Exec, Some(&self.sql)));
        let result = match named_to_positional(args) {
            Ok(values) => self.inner.exec(&values).instrument(span.clone()).await,
            Err(err) => Err(err),
        };
        self.tracer.finish_span(&span, &result);
        result
    }

    /// Run the prepared query and return its rows.
    pub async fn query(&mut self, args: &[NamedValue]) -> Result<Box<dyn Rows>, Error> {
        let span = self
            .tracer
            .new_span(&Operation::new(OperationKind::Query, Some(&self.sql)));
        let result = match named_to_positional(args) {
            Ok(values) => self.inner.query(&values).instrument(span.clone()).await,
            Err(err) => Err(err),
        };
        self.tracer.finish_span(&span, &result);
        result
    }
}

impl fmt::Debug for TracedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedStatement")
            .field("sql", &self.sql)
            .finish_non_exhaustive()
    }
}
