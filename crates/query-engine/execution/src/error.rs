//! Errors that can be thrown when executing queries.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// SQLSTATE raised when `statement_timeout` cancels a statement.
const QUERY_CANCELED: &str = "57014";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Query timeout exceeded")]
    QueryTimeout,
    #[error("Query execution error: {0}")]
    Database(String),
    #[error("database connection pool unavailable: {0}")]
    PoolUnavailable(String),
}

impl ExecutionError {
    /// Whether this is a fault of the service itself rather than of the statement.
    pub fn is_system_fault(&self) -> bool {
        matches!(self, ExecutionError::PoolUnavailable(_))
    }
}

impl From<sqlx::Error> for ExecutionError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(db_error) => {
                if db_error.code().as_deref() == Some(QUERY_CANCELED) {
                    ExecutionError::QueryTimeout
                } else {
                    ExecutionError::Database(sanitize(db_error.message()))
                }
            }
            sqlx::Error::PoolTimedOut => ExecutionError::PoolUnavailable(
                "timed out waiting for a connection".to_string(),
            ),
            sqlx::Error::PoolClosed => {
                ExecutionError::PoolUnavailable("the pool is closed".to_string())
            }
            other => ExecutionError::Database(sanitize(&other.to_string())),
        }
    }
}

fn connection_uri() -> &'static Regex {
    static URI: OnceLock<Regex> = OnceLock::new();
    URI.get_or_init(|| {
        Regex::new(r"(?i)\bpostgres(?:ql)?://\S+").expect("connection uri pattern is valid")
    })
}

/// Strip anything that could leak connection details from a database message.
pub fn sanitize(message: &str) -> String {
    connection_uri()
        .replace_all(message.trim(), "postgresql://[redacted]")
        .into_owned()
}
