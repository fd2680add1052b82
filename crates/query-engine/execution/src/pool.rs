//! Where connections come from.
//!
//! The executor only needs a handful of operations from a connection, so it
//! works against these traits. The PostgreSQL implementation wraps an sqlx
//! pool; connections are RAII guards that go back to the pool when dropped.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use query_engine_sql::sql::{Param, ValidatedSql};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::Query;
use sqlx::Postgres;

use crate::error::ExecutionError;
use crate::rows::{decode_row, Record};

/// A point-in-time view of a pool, used for metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStatus {
    pub size: u32,
    pub idle: usize,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

#[async_trait]
pub trait ConnectionPool: Send + Sync {
    type Connection: Connection;

    /// Borrow a connection. Failing to get one is a fault of the service,
    /// reported as [`ExecutionError::PoolUnavailable`].
    async fn acquire(&self) -> Result<Self::Connection, ExecutionError>;

    fn status(&self) -> PoolStatus;
}

#[async_trait]
pub trait Connection: Send {
    /// Bound how long the server may spend on each following statement.
    async fn set_statement_timeout(&mut self, timeout: Duration) -> Result<(), ExecutionError>;

    /// Run the statement and collect at most `limit` rows, in order.
    async fn fetch_rows(
        &mut self,
        sql: &ValidatedSql,
        limit: usize,
    ) -> Result<Vec<Record>, ExecutionError>;

    /// Check the connection is alive.
    async fn ping(&mut self) -> Result<(), ExecutionError>;
}

#[async_trait]
impl ConnectionPool for PgPool {
    type Connection = PoolConnection<Postgres>;

    async fn acquire(&self) -> Result<Self::Connection, ExecutionError> {
        sqlx::Pool::acquire(self).await.map_err(|error| match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => ExecutionError::from(error),
            other => {
                tracing::error!(error = %other, "unable to open a database connection");
                ExecutionError::PoolUnavailable(crate::error::sanitize(&other.to_string()))
            }
        })
    }

    fn status(&self) -> PoolStatus {
        let options = self.options();
        PoolStatus {
            size: self.size(),
            idle: self.num_idle(),
            max_connections: options.get_max_connections(),
            min_connections: options.get_min_connections(),
            acquire_timeout: options.get_acquire_timeout(),
        }
    }
}

#[async_trait]
impl Connection for PoolConnection<Postgres> {
    async fn set_statement_timeout(&mut self, timeout: Duration) -> Result<(), ExecutionError> {
        let statement = format!("SET statement_timeout = {}", timeout.as_millis());
        sqlx::query(&statement).execute(&mut **self).await?;
        Ok(())
    }

    async fn fetch_rows(
        &mut self,
        sql: &ValidatedSql,
        limit: usize,
    ) -> Result<Vec<Record>, ExecutionError> {
        let query = bind_params(sqlx::query(sql.sql()), sql.params());
        let mut stream = query.fetch(&mut **self);
        let mut records = Vec::new();
        while records.len() < limit {
            match stream.try_next().await? {
                Some(row) => records.push(decode_row(&row)?),
                None => break,
            }
        }
        Ok(records)
    }

    async fn ping(&mut self) -> Result<(), ExecutionError> {
        sqlx::query("SELECT 1").execute(&mut **self).await?;
        Ok(())
    }
}

/// Bind each parameter to its positional placeholder, in order.
fn bind_params<'q>(
    query: Query<'q, Postgres, PgArguments>,
    params: &'q [Param],
) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(query, |query, param| match param {
        Param::String(string) => query.bind(string.as_str()),
        Param::Value(value) => query.bind(sqlx::types::Json(value)),
    })
}
