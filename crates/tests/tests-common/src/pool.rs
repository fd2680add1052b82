//! An in-memory connection pool whose connections answer from a script.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use query_engine_execution::{Connection, ConnectionPool, ExecutionError, PoolStatus, Record};
use query_engine_sql::sql::ValidatedSql;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// What every connection does when asked to run a statement.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Return these rows (up to the requested limit).
    Rows(Vec<Record>),
    /// Take this long, then return no rows.
    Sleep(Duration),
    /// Fail every statement with this error.
    Fail(ExecutionError),
    /// Refuse to hand out connections at all.
    Unavailable,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    permits: Arc<Semaphore>,
    acquire_timeout: Duration,
    behavior: Mutex<Behavior>,
    executed: Mutex<Vec<String>>,
    statement_timeouts: Mutex<Vec<Duration>>,
}

#[derive(Debug, Clone)]
pub struct InMemoryPool {
    inner: Arc<Inner>,
}

impl InMemoryPool {
    pub fn new(capacity: usize, behavior: Behavior) -> Self {
        InMemoryPool {
            inner: Arc::new(Inner {
                capacity,
                permits: Arc::new(Semaphore::new(capacity)),
                acquire_timeout: Duration::from_millis(200),
                behavior: Mutex::new(behavior),
                executed: Mutex::default(),
                statement_timeouts: Mutex::default(),
            }),
        }
    }

    pub fn with_rows(rows: Vec<Record>) -> Self {
        InMemoryPool::new(2, Behavior::Rows(rows))
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.inner.behavior.lock().unwrap() = behavior;
    }

    /// Connections not currently borrowed.
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Every statement a connection was asked to run, in order.
    pub fn executed(&self) -> Vec<String> {
        self.inner.executed.lock().unwrap().clone()
    }

    pub fn statement_timeouts(&self) -> Vec<Duration> {
        self.inner.statement_timeouts.lock().unwrap().clone()
    }

    fn behavior(&self) -> Behavior {
        self.inner.behavior.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct InMemoryConnection {
    pool: InMemoryPool,
    _permit: OwnedSemaphorePermit,
}

#[async_trait]
impl ConnectionPool for InMemoryPool {
    type Connection = InMemoryConnection;

    async fn acquire(&self) -> Result<InMemoryConnection, ExecutionError> {
        if matches!(self.behavior(), Behavior::Unavailable) {
            return Err(ExecutionError::PoolUnavailable(
                "connection refused".to_string(),
            ));
        }
        let permit = tokio::time::timeout(
            self.inner.acquire_timeout,
            self.inner.permits.clone().acquire_owned(),
        )
        .await
        .map_err(|_| {
            ExecutionError::PoolUnavailable("timed out waiting for a connection".to_string())
        })?
        .map_err(|_| ExecutionError::PoolUnavailable("the pool is closed".to_string()))?;

        Ok(InMemoryConnection {
            pool: self.clone(),
            _permit: permit,
        })
    }

    fn status(&self) -> PoolStatus {
        let capacity = u32::try_from(self.inner.capacity).unwrap_or(u32::MAX);
        PoolStatus {
            size: capacity,
            idle: self.available(),
            max_connections: capacity,
            min_connections: 0,
            acquire_timeout: self.inner.acquire_timeout,
        }
    }
}

#[async_trait]
impl Connection for InMemoryConnection {
    async fn set_statement_timeout(&mut self, timeout: Duration) -> Result<(), ExecutionError> {
        self.pool
            .inner
            .statement_timeouts
            .lock()
            .unwrap()
            .push(timeout);
        Ok(())
    }

    async fn fetch_rows(
        &mut self,
        sql: &ValidatedSql,
        limit: usize,
    ) -> Result<Vec<Record>, ExecutionError> {
        self.pool
            .inner
            .executed
            .lock()
            .unwrap()
            .push(sql.sql().to_string());

        match self.pool.behavior() {
            Behavior::Rows(rows) => Ok(rows.into_iter().take(limit).collect()),
            Behavior::Sleep(duration) => {
                tokio::time::sleep(duration).await;
                Ok(vec![])
            }
            Behavior::Fail(error) => Err(error),
            Behavior::Unavailable => Err(ExecutionError::PoolUnavailable(
                "connection lost".to_string(),
            )),
        }
    }

    async fn ping(&mut self) -> Result<(), ExecutionError> {
        match self.pool.behavior() {
            Behavior::Fail(error) => Err(error),
            _ => Ok(()),
        }
    }
}
