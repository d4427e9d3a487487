//! Traced driver and connection wrappers.

use std::fmt;
use std::sync::Arc;

use tracing::Instrument;

use crate::config::TracingConfig;
use crate::driver::{Connection, Driver, ExecResult, Rows};
use crate::error::Error;
use crate::statement::TracedStatement;
use crate::tracer::{Operation, OperationKind, Tracer};
use crate::transaction::TracedTransaction;
use crate::value::NamedValue;

/// A tracing wrapper around an underlying [`Driver`].
///
/// Every connection opened through it, and every statement or transaction
/// derived from those connections, shares this driver's configuration and
/// emits one span per operation.
///
/// # Example
///
/// ```rust,ignore
/// use sql_tracing::{TracingConfig, TracingExt};
///
/// let driver = MyDriver::connect_options(...)
///     .with_tracing_config(TracingConfig::new().with_query_capture(true));
///
/// let mut conn = driver.open("postgres://localhost/mydb").await?;
/// conn.exec("INSERT INTO t VALUES (1)", &[]).await?;
/// ```
pub struct TracedDriver<D> {
    inner: D,
    tracer: Arc<Tracer>,
}

impl<D: Driver> TracedDriver<D> {
    /// Wrap a driver with the given configuration.
    pub fn new(driver: D, config: TracingConfig) -> Self {
        Self {
            inner: driver,
            tracer: Arc::new(Tracer::new(config)),
        }
    }

    /// Wrap a driver with the default configuration.
    pub fn wrap(driver: D) -> Self {
        Self::new(driver, TracingConfig::default())
    }

    /// Get a reference to the underlying driver.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Consume the wrapper and return the underlying driver.
    pub fn into_inner(self) -> D {
        self.inner
    }

    /// Get the tracing configuration.
    pub fn config(&self) -> &TracingConfig {
        self.tracer.config()
    }

    /// Open a connection against `dsn`.
    ///
    /// A failed open produces no span and returns the underlying error
    /// unchanged; only a successfully opened connection is instrumented.
    pub async fn open(&self, dsn: &str) -> Result<TracedConnection, Error> {
        let conn = self.inner.open(dsn).await?;
        Ok(TracedConnection {
            inner: conn,
            tracer: Arc::clone(&self.tracer),
        })
    }
}

impl<D> fmt::Debug for TracedDriver<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedDriver").finish_non_exhaustive()
    }
}

/// Extension trait for wrapping drivers with tracing instrumentation.
pub trait TracingExt: Driver + Sized {
    /// Wrap this driver with default tracing configuration.
    fn with_tracing(self) -> TracedDriver<Self> {
        TracedDriver::wrap(self)
    }

    /// Wrap this driver with a custom tracing configuration.
    fn with_tracing_config(self, config: TracingConfig) -> TracedDriver<Self> {
        TracedDriver::new(self, config)
    }
}

impl<D: Driver> TracingExt for D {}

/// A database connection whose operations are bracketed by spans.
///
/// Each method opens a span, runs the delegate call inside it, records the
/// outcome, and lets the span close when the call returns. The one exception
/// is the span opened by [`TracedConnection::begin`], which is handed to the
/// returned transaction and stays open until commit or rollback.
pub struct TracedConnection {
    inner: Box<dyn Connection>,
    tracer: Arc<Tracer>,
}

impl TracedConnection {
    /// Prepare a statement.
    ///
    /// The returned [`TracedStatement`] remembers the statement text so
    /// later executions can be named and tagged from it.
    pub async fn prepare(&mut self, sql: &str) -> Result<TracedStatement, Error> {
        let span = self
            .tracer
            .new_span(&Operation::new(OperationKind::Prepare, Some(sql)));
        let result = self.inner.prepare(sql).instrument(span.clone()).await;
        self.tracer.finish_span(&span, &result);
        result.map(|stmt| TracedStatement::new(stmt, sql.to_owned(), Arc::clone(&self.tracer)))
    }

    /// Execute `sql` directly, without preparing it first.
    pub async fn exec(&mut self, sql: &str, args: &[NamedValue]) -> Result<ExecResult, Error> {
        let span = self
            .tracer
            .new_span(&Operation::new(OperationKind::Exec, Some(sql)));
        let result = self.inner.exec(sql, args).instrument(span.clone()).await;
        self.tracer.finish_span(&span, &result);
        result
    }

    /// Run `sql` directly and return its rows.
    pub async fn query(&mut self, sql: &str, args: &[NamedValue]) -> Result<Box<dyn Rows>, Error> {
        let span = self
            .tracer
            .new_span(&Operation::new(OperationKind::Query, Some(sql)));
        let result = self.inner.query(sql, args).instrument(span.clone()).await;
        self.tracer.finish_span(&span, &result);
        result
    }

    /// Start a transaction.
    ///
    /// The transaction span opens here and stays open until the first commit
    /// or rollback on the returned wrapper, or until the wrapper is dropped.
    pub async fn begin(&mut self) -> Result<TracedTransaction, Error> {
        let span = self
            .tracer
            .new_span(&Operation::new(OperationKind::Begin, None));
        match self.inner.begin().instrument(span.clone()).await {
            Ok(tx) => Ok(TracedTransaction::new(tx, Arc::clone(&self.tracer), span)),
            Err(err) => {
                self.tracer.fail_span(&span, &err);
                Err(err)
            }
        }
    }
}

impl fmt::Debug for TracedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedConnection").finish_non_exhaustive()
    }
}
