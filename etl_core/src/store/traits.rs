use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Bind parameter for a store statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    I32(i32),
    I64(i64),
    F64(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

/// A single SQL statement plus its positional (`$1`, `$2`, ...) parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: &'static str,
    pub params: Vec<SqlParam>,
}

/// A record that knows how to write itself idempotently.
pub trait Upsert {
    /// Table the statement targets (for logging).
    fn table(&self) -> &'static str;

    /// `INSERT ... ON CONFLICT (<natural key>) DO NOTHING` for this record.
    fn upsert(&self) -> Statement;
}

/// Relational store accessed one statement at a time.
///
/// Implementations must commit each successful statement and release any
/// connection they acquired whether the statement succeeded or not. Errors are
/// returned, never swallowed.
#[async_trait]
pub trait Store: Send + Sync {
    /// Execute one statement; returns rows affected.
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<()> {
        self.execute("SELECT 1", &[]).await.map(|_| ())
    }
}
