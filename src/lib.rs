//! # sql-tracing
//!
//! Tracing instrumentation for SQL database drivers.
//!
//! This crate wraps a low-level database driver so every connection,
//! prepared statement, transaction, and query executed through it emits a
//! [`tracing`] span. The wrappers are transparent: errors from the
//! underlying driver pass through unchanged, with no retries and no
//! translation. The only behavior added is span creation, attribution, and
//! closure.
//!
//! ## Features
//!
//! - **Automatic instrumentation**: one span per driver operation, closed on
//!   success, on error, and when an open transaction is dropped
//! - **OpenTelemetry compatible**: spans carry `otel.name`,
//!   `otel.status_code`, and `error.message` fields an OpenTelemetry layer
//!   picks up
//! - **Pluggable naming**: span names come from a configurable strategy; the
//!   default summarizes the statement (`"SELECT users"`)
//! - **Optional query capture**: attach the literal SQL text to spans,
//!   disabled by default
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sql_tracing::TracingExt;
//!
//! // Wrap any driver implementing the `Driver` contract
//! let driver = my_driver.with_tracing();
//!
//! // Use it exactly like the undecorated driver
//! let mut conn = driver.open("postgres://localhost/mydb").await?;
//! conn.exec("INSERT INTO users VALUES ($1)", &args).await?;
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use sql_tracing::{Operation, TracingConfig, TracingExt};
//!
//! let config = TracingConfig::new()
//!     .with_query_capture(true) // Include SQL in spans (default: false)
//!     .with_span_name_fn(|op: &Operation<'_>| format!("db.{}", op.kind));
//!
//! let driver = my_driver.with_tracing_config(config);
//! ```
//!
//! ## Span Fields
//!
//! | Field | Description |
//! |-------|-------------|
//! | `otel.name` | Span name computed by the naming strategy |
//! | `db.operation` | Wrapper operation (`prepare`, `exec`, `query`, `begin`) |
//! | `query` | Literal statement text (only when capture is enabled) |
//! | `otel.status_code` | `"OK"` or `"ERROR"` |
//! | `error.message` | Error details (on failure) |
//!
//! ## Transactions
//!
//! A transaction's span opens at `begin` and stays open until the first
//! `commit` or `rollback`, which records the outcome and closes it. A second
//! commit/rollback is passed straight through to the underlying driver.

mod config;
mod connection;
mod driver;
mod error;
mod parser;
mod statement;
mod tracer;
mod transaction;
mod value;

pub use config::TracingConfig;
pub use connection::{TracedConnection, TracedDriver, TracingExt};
pub use driver::{Connection, Driver, ExecResult, Rows, Statement, Transaction};
pub use error::{BoxDynError, Error};
pub use statement::TracedStatement;
pub use tracer::{statement_span_name, Operation, OperationKind, SpanNameFn};
pub use transaction::TracedTransaction;
pub use value::{named_to_positional, NamedValue, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        NamedValue, TracedConnection, TracedDriver, TracedStatement, TracedTransaction,
        TracingConfig, TracingExt, Value,
    };
}
