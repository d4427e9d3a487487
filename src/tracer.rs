//! Span factory shared by every wrapper spawned from one traced driver.

use std::fmt;

use tracing::{field, Span};

use crate::config::TracingConfig;
use crate::error::Error;
use crate::parser;

/// The operations a wrapper method can perform against the underlying
/// driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Prepare,
    Exec,
    Query,
    Begin,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Prepare => "prepare",
            OperationKind::Exec => "exec",
            OperationKind::Query => "query",
            OperationKind::Begin => "begin",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context for one traced call, handed to the configured naming function.
///
/// Each wrapper method fills in its own kind and, when the call carries one,
/// the statement text, so a naming strategy never has to guess where it was
/// invoked from.
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    /// Which wrapper method is executing.
    pub kind: OperationKind,
    /// Statement text, when the call carries one.
    pub statement: Option<&'a str>,
}

impl<'a> Operation<'a> {
    pub(crate) fn new(kind: OperationKind, statement: Option<&'a str>) -> Self {
        Self { kind, statement }
    }
}

/// A span naming strategy.
///
/// Returning an empty string is allowed; the span is still created, just
/// unnamed. Naming is best-effort and must never abort the traced operation.
pub type SpanNameFn = dyn Fn(&Operation<'_>) -> String + Send + Sync;

/// Default naming strategy: a summary of the statement when the operation
/// carries one (`"SELECT users"`), otherwise the upper-cased operation kind
/// (`"BEGIN"`).
pub fn statement_span_name(op: &Operation<'_>) -> String {
    match op.statement {
        Some(sql) => parser::statement_summary(sql),
        None => op.kind.as_str().to_uppercase(),
    }
}

/// Span factory holding the shared configuration.
///
/// One `Tracer` is created per traced driver and shared by reference with
/// every connection, statement, and transaction spawned from it. It is
/// read-only after construction.
pub(crate) struct Tracer {
    config: TracingConfig,
}

impl Tracer {
    pub(crate) fn new(config: TracingConfig) -> Self {
        Self { config }
    }

    pub(crate) fn config(&self) -> &TracingConfig {
        &self.config
    }

    /// Open a span for `op`. The caller owns closing it: through
    /// [`Tracer::finish_span`] once the delegate call returns, or by handing
    /// the span to a transaction wrapper that outlives the call.
    pub(crate) fn new_span(&self, op: &Operation<'_>) -> Span {
        let name = self.config.span_name(op);
        let span = if op.kind == OperationKind::Begin {
            tracing::info_span!(
                "db.transaction",
                otel.name = %name,
                db.operation = %op.kind,
                query = field::Empty,
                otel.status_code = field::Empty,
                error.message = field::Empty,
            )
        } else {
            tracing::info_span!(
                "db.query",
                otel.name = %name,
                db.operation = %op.kind,
                query = field::Empty,
                otel.status_code = field::Empty,
                error.message = field::Empty,
            )
        };

        if self.config.save_query {
            if let Some(sql) = op.statement {
                span.record("query", sql);
            }
        }

        span
    }

    /// Record the outcome of a delegate call on `span` before it closes.
    pub(crate) fn finish_span<T>(&self, span: &Span, result: &Result<T, Error>) {
        match result {
            Ok(_) => {
                span.record("otel.status_code", "OK");
            }
            Err(err) => self.fail_span(span, err),
        }
    }

    /// Record a failure on `span` before it closes.
    pub(crate) fn fail_span(&self, span: &Span, err: &Error) {
        span.record("otel.status_code", "ERROR");
        span.record("error.message", err.to_string().as_str());
    }
}
