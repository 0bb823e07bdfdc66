use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgConnection, PgPool, PgPoolOptions, Postgres};
use sqlx::{Arguments, Connection};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::store::traits::{SqlParam, Store};
use crate::{Error, Result};

/// A connection checked out for the duration of one statement.
pub enum ScopedConnection {
    /// Dedicated connection, closed on release.
    Direct(PgConnection),
    /// Pool connection, returned to the pool on release.
    Pooled(PoolConnection<Postgres>),
}

impl ScopedConnection {
    pub fn conn_mut(&mut self) -> &mut PgConnection {
        match self {
            Self::Direct(conn) => conn,
            Self::Pooled(conn) => &mut **conn,
        }
    }

    pub async fn release(self) -> Result<()> {
        match self {
            Self::Direct(conn) => conn
                .close()
                .await
                .map_err(|e| Error::backend("close postgres connection", e)),
            Self::Pooled(conn) => {
                drop(conn);
                Ok(())
            }
        }
    }
}

/// Scoped connection acquisition. Call sites only see `acquire`/`release`, so a
/// pooled source can replace the per-call one without touching them.
#[async_trait]
pub trait ConnectionSource: Send + Sync {
    async fn acquire(&self) -> Result<ScopedConnection>;

    fn kind(&self) -> &'static str;
}

/// Opens a brand new connection for every statement. No deadline is applied;
/// only the pooled source bounds how long an acquire may wait.
#[derive(Clone)]
pub struct PerCallConnections {
    options: PgConnectOptions,
}

impl PerCallConnections {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ConnectionSource for PerCallConnections {
    async fn acquire(&self) -> Result<ScopedConnection> {
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| Error::backend("connect postgres", e))?;
        Ok(ScopedConnection::Direct(conn))
    }

    fn kind(&self) -> &'static str {
        "per_call"
    }
}

/// Checks connections out of a shared `PgPool`.
#[derive(Clone)]
pub struct PooledConnections {
    pool: PgPool,
}

impl PooledConnections {
    /// Lazily connecting pool; no connection is opened until the first acquire.
    pub fn lazy(options: PgConnectOptions, max_connections: u32, acquire_timeout: Duration) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(options);
        Self { pool }
    }
}

#[async_trait]
impl ConnectionSource for PooledConnections {
    async fn acquire(&self) -> Result<ScopedConnection> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| Error::backend("acquire pooled postgres connection", e))?;
        Ok(ScopedConnection::Pooled(conn))
    }

    fn kind(&self) -> &'static str {
        "pooled"
    }
}

/// Postgres-backed `Store`: one connection scope and one committed
/// transaction per statement.
#[derive(Clone)]
pub struct PgStore {
    connections: Arc<dyn ConnectionSource>,
}

impl PgStore {
    pub fn new(connections: Arc<dyn ConnectionSource>) -> Self {
        Self { connections }
    }

    /// Per-call connections when `pool_size` is 0, a lazy pool otherwise.
    pub fn from_config(cfg: &DatabaseConfig) -> Self {
        let options = Self::connect_options(cfg);
        let connections: Arc<dyn ConnectionSource> = if cfg.pool_size == 0 {
            Arc::new(PerCallConnections::new(options))
        } else {
            Arc::new(PooledConnections::lazy(options, cfg.pool_size, cfg.connect_timeout))
        };
        tracing::debug!(
            db = %cfg.redacted_connection_string(),
            connections = connections.kind(),
            "postgres store configured"
        );
        Self::new(connections)
    }

    pub fn connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .database(&cfg.dbname)
            .username(&cfg.user);
        if !cfg.password.is_empty() {
            options = options.password(&cfg.password);
        }
        options
    }

    pub fn connection_kind(&self) -> &'static str {
        self.connections.kind()
    }

    fn add_params(args: &mut PgArguments, params: &[SqlParam]) -> Result<()> {
        for p in params {
            match p {
                SqlParam::I32(v) => args
                    .add(*v)
                    .map_err(|e| Error::BackendMessage(format!("bind i32: {e}")))?,
                SqlParam::I64(v) => args
                    .add(*v)
                    .map_err(|e| Error::BackendMessage(format!("bind i64: {e}")))?,
                SqlParam::F64(v) => args
                    .add(*v)
                    .map_err(|e| Error::BackendMessage(format!("bind f64: {e}")))?,
                SqlParam::String(v) => args
                    .add(v.clone())
                    .map_err(|e| Error::BackendMessage(format!("bind string: {e}")))?,
                SqlParam::Timestamp(v) => args
                    .add(*v)
                    .map_err(|e| Error::BackendMessage(format!("bind timestamp: {e}")))?,
            }
        }
        Ok(())
    }

    async fn execute_on(conn: &mut PgConnection, sql: &str, params: &[SqlParam]) -> Result<u64> {
        let mut args = PgArguments::default();
        Self::add_params(&mut args, params)?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| Error::backend("begin statement tx", e))?;
        let res = sqlx::query_with(sql, args)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::backend("execute statement", e))?;
        tx.commit()
            .await
            .map_err(|e| Error::backend("commit statement tx", e))?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(level = "debug", skip(self, sql, params), fields(params = params.len()))]
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<u64> {
        let mut conn = self.connections.acquire().await.inspect_err(|e| {
            tracing::error!(error = ?e, "database connection error");
        })?;

        let result = Self::execute_on(conn.conn_mut(), sql, params).await;

        // Released on both paths; a failed close does not mask the statement result.
        if let Err(e) = conn.release().await {
            tracing::warn!(error = ?e, "failed to release database connection");
        }

        result.inspect_err(|e| {
            tracing::error!(error = ?e, "database statement failed");
        })
    }
}
