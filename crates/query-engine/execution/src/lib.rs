//! Query execution against a PostgreSQL database.

pub mod error;
pub mod execution;
pub mod metrics;
pub mod pool;
pub mod rows;

pub use error::ExecutionError;
pub use execution::GuardedExecutor;
pub use pool::{Connection, ConnectionPool, PoolStatus};
pub use rows::{Record, ResultSet};
