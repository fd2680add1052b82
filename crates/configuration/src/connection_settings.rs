//! Database connection settings.

use crate::values::{ConnectionUri, PoolSettings};

pub const DEFAULT_CONNECTION_URI_VARIABLE: &str = "DATABASE_URL";

/// Database connection settings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DatabaseConnectionSettings {
    /// Connection string for a Postgres-compatible database.
    pub connection_uri: ConnectionUri,
    /// Connection pool settings.
    pub pool_settings: PoolSettings,
}
