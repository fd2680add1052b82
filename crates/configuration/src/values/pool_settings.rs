/// Settings for the PostgreSQL connection pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// minimum number of pool connections
    pub min_connections: u32,
    /// maximum number of pool connections
    pub max_connections: u32,
    /// timeout for acquiring a connection from the pool (seconds)
    pub pool_timeout: u64,
    /// idle timeout for releasing a connection from the pool (seconds)
    pub idle_timeout: Option<u64>,
    /// maximum lifetime for an individual connection (seconds)
    pub connection_lifetime: Option<u64>,
}

impl Default for PoolSettings {
    fn default() -> PoolSettings {
        PoolSettings {
            min_connections: 10,
            max_connections: 20,
            pool_timeout: 30,
            idle_timeout: Some(180),
            connection_lifetime: Some(600),
        }
    }
}
