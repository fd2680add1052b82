//! Execute validated statements under a timeout and a row cap.

use nom_nlq_configuration::QueryLimits;
use query_engine_sql::sql::ValidatedSql;
use tracing::{info_span, Instrument};

use crate::error::ExecutionError;
use crate::pool::{Connection, ConnectionPool};
use crate::rows::ResultSet;

pub struct GuardedExecutor<P> {
    pool: P,
    limits: QueryLimits,
}

impl<P: ConnectionPool> GuardedExecutor<P> {
    pub fn new(pool: P, limits: QueryLimits) -> Self {
        GuardedExecutor { pool, limits }
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn limits(&self) -> QueryLimits {
        self.limits
    }

    /// Run a validated statement.
    ///
    /// The database enforces the statement timeout; the same bound is applied
    /// on our side in case the server does not answer. The borrowed
    /// connection goes back to the pool however this returns.
    pub async fn execute(&self, sql: &ValidatedSql) -> Result<ResultSet, ExecutionError> {
        let mut connection = self
            .pool
            .acquire()
            .instrument(info_span!("Acquire connection"))
            .await?;

        let timeout = self.limits.statement_timeout;
        let max_rows = self.limits.max_rows;

        let fetch = async {
            connection.set_statement_timeout(timeout).await?;
            // One extra row tells us whether the result was cut short.
            connection.fetch_rows(sql, max_rows.saturating_add(1)).await
        };

        let rows = match tokio::time::timeout(timeout, fetch)
            .instrument(info_span!("Database request", limit = max_rows))
            .await
        {
            Ok(rows) => rows?,
            Err(_elapsed) => {
                tracing::warn!(?timeout, "statement did not finish in time");
                return Err(ExecutionError::QueryTimeout);
            }
        };

        let result = ResultSet::capped(rows, max_rows);
        tracing::info!(
            row_count = result.row_count(),
            truncated = result.truncated,
            "statement executed"
        );
        Ok(result)
    }

    /// Whether a connection can be borrowed and answers a trivial query.
    pub async fn is_healthy(&self) -> bool {
        match self.pool.acquire().await {
            Ok(mut connection) => match connection.ping().await {
                Ok(()) => true,
                Err(error) => {
                    tracing::warn!(%error, "database health check failed");
                    false
                }
            },
            Err(error) => {
                tracing::warn!(%error, "database health check could not get a connection");
                false
            }
        }
    }
}
