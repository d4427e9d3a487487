//! Shared test support: a span-capturing subscriber layer and an in-memory
//! driver that records every call it receives.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};

use sql_tracing::{
    Connection, Driver, Error, ExecResult, NamedValue, Rows, Statement, Transaction, Value,
};

// ---------------------------------------------------------------------------
// Span capture
// ---------------------------------------------------------------------------

/// One span observed by the capturing layer.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    id: u64,
    /// Static span name from the macro call site.
    pub name: &'static str,
    /// Fields recorded at creation or afterwards, rendered as strings.
    pub fields: BTreeMap<String, String>,
    /// Whether the span has closed.
    pub closed: bool,
}

impl CapturedSpan {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Collects every span created while its subscriber is installed.
#[derive(Clone, Default)]
pub struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl SpanCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a capturing subscriber as the thread default; spans are
    /// recorded until the returned guard drops.
    #[must_use]
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        use tracing_subscriber::prelude::*;

        let layer = CaptureLayer {
            capture: self.clone(),
        };
        tracing::subscriber::set_default(tracing_subscriber::registry().with(layer))
    }

    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }
}

struct CaptureLayer {
    capture: SpanCapture,
}

struct FieldVisitor<'a>(&'a mut BTreeMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        attrs.record(&mut FieldVisitor(&mut fields));
        self.capture.spans.lock().unwrap().push(CapturedSpan {
            id: id.into_u64(),
            name: attrs.metadata().name(),
            fields,
            closed: false,
        });
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut spans = self.capture.spans.lock().unwrap();
        // Registry reuses ids once a span closes, so match the live entry.
        if let Some(span) = spans
            .iter_mut()
            .rev()
            .find(|s| s.id == id.into_u64() && !s.closed)
        {
            values.record(&mut FieldVisitor(&mut span.fields));
        }
    }

    fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
        let mut spans = self.capture.spans.lock().unwrap();
        if let Some(span) = spans
            .iter_mut()
            .rev()
            .find(|s| s.id == id.into_u64() && !s.closed)
        {
            span.closed = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Mock driver
// ---------------------------------------------------------------------------

pub type CallLog = Arc<Mutex<Vec<String>>>;

/// In-memory driver whose connections record every delegate call, with
/// switches to make individual operations fail.
#[derive(Default)]
pub struct MockDriver {
    pub fail_open: bool,
    pub fail_exec: bool,
    pub fail_commit: bool,
    pub log: CallLog,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn open(&self, dsn: &str) -> Result<Box<dyn Connection>, Error> {
        if self.fail_open {
            return Err(Error::driver("connection refused"));
        }
        self.log.lock().unwrap().push(format!("open {dsn}"));
        Ok(Box::new(MockConnection {
            fail_exec: self.fail_exec,
            fail_commit: self.fail_commit,
            log: Arc::clone(&self.log),
        }))
    }
}

pub struct MockConnection {
    fail_exec: bool,
    fail_commit: bool,
    log: CallLog,
}

#[async_trait]
impl Connection for MockConnection {
    async fn prepare(&mut self, sql: &str) -> Result<Box<dyn Statement>, Error> {
        self.log.lock().unwrap().push(format!("prepare {sql}"));
        Ok(Box::new(MockStatement {
            fail_exec: self.fail_exec,
            log: Arc::clone(&self.log),
        }))
    }

    async fn exec(&mut self, sql: &str, args: &[NamedValue]) -> Result<ExecResult, Error> {
        if self.fail_exec {
            return Err(Error::driver("exec failed"));
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("exec {sql} ({} args)", args.len()));
        Ok(ExecResult {
            rows_affected: 1,
            last_insert_id: None,
        })
    }

    async fn query(&mut self, sql: &str, args: &[NamedValue]) -> Result<Box<dyn Rows>, Error> {
        if self.fail_exec {
            return Err(Error::driver("query failed"));
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("query {sql} ({} args)", args.len()));
        Ok(Box::new(MockRows::one_row()))
    }

    async fn begin(&mut self) -> Result<Box<dyn Transaction>, Error> {
        self.log.lock().unwrap().push("begin".to_owned());
        Ok(Box::new(MockTransaction {
            fail_commit: self.fail_commit,
            log: Arc::clone(&self.log),
        }))
    }
}

pub struct MockStatement {
    fail_exec: bool,
    log: CallLog,
}

#[async_trait]
impl Statement for MockStatement {
    async fn exec(&mut self, args: &[Value]) -> Result<ExecResult, Error> {
        if self.fail_exec {
            return Err(Error::driver("exec failed"));
        }
        self.log.lock().unwrap().push(format!("stmt.exec {args:?}"));
        Ok(ExecResult {
            rows_affected: args.len() as u64,
            last_insert_id: Some(1),
        })
    }

    async fn query(&mut self, args: &[Value]) -> Result<Box<dyn Rows>, Error> {
        self.log
            .lock()
            .unwrap()
            .push(format!("stmt.query {args:?}"));
        Ok(Box::new(MockRows::one_row()))
    }
}

pub struct MockTransaction {
    fail_commit: bool,
    log: CallLog,
}

#[async_trait]
impl Transaction for MockTransaction {
    async fn commit(&mut self) -> Result<(), Error> {
        self.log.lock().unwrap().push("commit".to_owned());
        if self.fail_commit {
            return Err(Error::driver("commit failed"));
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), Error> {
        self.log.lock().unwrap().push("rollback".to_owned());
        Ok(())
    }
}

pub struct MockRows {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl MockRows {
    fn one_row() -> Self {
        Self {
            columns: vec!["id".to_owned()],
            rows: vec![vec![Value::Int(1)]],
        }
    }
}

#[async_trait]
impl Rows for MockRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    async fn next(&mut self) -> Result<Option<Vec<Value>>, Error> {
        if self.rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.rows.remove(0)))
        }
    }
}
