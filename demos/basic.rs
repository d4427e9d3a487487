//! Basic example wrapping a tiny in-memory driver with tracing.
//!
//! Run with: cargo run --example basic

use async_trait::async_trait;
use sql_tracing::prelude::*;
use sql_tracing::{Connection, Driver, Error, ExecResult, Rows, Statement, Transaction};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing subscriber, printing spans as they open and close
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE))
        .init();

    // Wrap the driver; every operation below emits a span
    let driver = MemoryDriver.with_tracing_config(TracingConfig::new().with_query_capture(true));

    let mut conn = driver.open("mem://demo").await?;
    conn.exec("CREATE TABLE users (id INT, name TEXT)", &[])
        .await?;

    let mut stmt = conn.prepare("INSERT INTO users VALUES ($1, $2)").await?;
    stmt.exec(&[
        NamedValue::positional(1, Value::Int(1)),
        NamedValue::positional(2, Value::Text("ada".into())),
    ])
    .await?;

    let mut rows = conn.query("SELECT * FROM users", &[]).await?;
    while let Some(row) = rows.next().await? {
        tracing::info!(?row, "fetched row");
    }

    let mut tx = conn.begin().await?;
    tx.commit().await?;

    Ok(())
}

// A throwaway driver that accepts everything and returns canned results.

struct MemoryDriver;

#[async_trait]
impl Driver for MemoryDriver {
    async fn open(&self, _dsn: &str) -> Result<Box<dyn Connection>, Error> {
        Ok(Box::new(MemoryConnection))
    }
}

struct MemoryConnection;

#[async_trait]
impl Connection for MemoryConnection {
    async fn prepare(&mut self, _sql: &str) -> Result<Box<dyn Statement>, Error> {
        Ok(Box::new(MemoryStatement))
    }

    async fn exec(&mut self, _sql: &str, args: &[NamedValue]) -> Result<ExecResult, Error> {
        Ok(ExecResult {
            rows_affected: args.len() as u64,
            last_insert_id: None,
        })
    }

    async fn query(&mut self, _sql: &str, _args: &[NamedValue]) -> Result<Box<dyn Rows>, Error> {
        Ok(Box::new(MemoryRows {
            columns: vec!["id".to_owned(), "name".to_owned()],
            rows: vec![vec![Value::Int(1), Value::Text("ada".to_owned())]],
        }))
    }

    async fn begin(&mut self) -> Result<Box<dyn Transaction>, Error> {
        Ok(Box::new(MemoryTransaction))
    }
}

struct MemoryStatement;

#[async_trait]
impl Statement for MemoryStatement {
    async fn exec(&mut self, args: &[Value]) -> Result<ExecResult, Error> {
        Ok(ExecResult {
            rows_affected: args.len() as u64,
            last_insert_id: Some(1),
        })
    }

    async fn query(&mut self, _args: &[Value]) -> Result<Box<dyn Rows>, Error> {
        Ok(Box::new(MemoryRows {
            columns: vec!["id".to_owned()],
            rows: vec![vec![Value::Int(1)]],
        }))
    }
}

struct MemoryTransaction;

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(&mut self) -> Result<(), Error> {
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

struct MemoryRows {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

#[async_trait]
impl Rows for MemoryRows {
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
