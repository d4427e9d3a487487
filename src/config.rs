//! Configuration for tracing behavior.

use std::fmt;
use std::sync::Arc;

use crate::tracer::{statement_span_name, Operation, SpanNameFn};

/// Configuration options for database tracing.
///
/// Immutable once the traced driver is constructed, and shared read-only by
/// every connection, statement, and transaction spawned from it.
///
/// # Example
///
/// ```rust
/// use sql_tracing::{Operation, TracingConfig};
///
/// let config = TracingConfig::new()
///     .with_query_capture(true)
///     .with_span_name_fn(|op: &Operation<'_>| format!("db.{}", op.kind));
/// ```
#[derive(Clone)]
pub struct TracingConfig {
    /// Whether to attach the literal statement text to spans under the
    /// `query` field.
    /// Default: `false` (query text may contain sensitive data)
    pub save_query: bool,

    span_name_fn: Arc<SpanNameFn>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            save_query: false,
            span_name_fn: Arc::new(statement_span_name),
        }
    }
}

impl TracingConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable capture of statement text in spans.
    ///
    /// **Security Warning**: Enabling this may expose sensitive data in your
    /// traces if queries embed credentials or PII in the SQL text itself.
    pub fn with_query_capture(mut self, enabled: bool) -> Self {
        self.save_query = enabled;
        self
    }

    /// Install a custom span naming strategy.
    ///
    /// The function receives the context of each traced call and returns the
    /// span name. An empty return value still produces a span.
    pub fn with_span_name_fn<F>(mut self, name_fn: F) -> Self
    where
        F: Fn(&Operation<'_>) -> String + Send + Sync + 'static,
    {
        self.span_name_fn = Arc::new(name_fn);
        self
    }

    pub(crate) fn span_name(&self, op: &Operation<'_>) -> String {
        (self.span_name_fn)(op)
    }
}

impl fmt::Debug for TracingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingConfig")
            .field("save_query", &self.save_query)
            .finish_non_exhaustive()
    }
}
