//! Runtime configuration for the service.

use std::time::Duration;

use url::Url;

use crate::connection_settings::DatabaseConnectionSettings;
use crate::error::ConfigurationError;
use crate::options::ServerOptions;
use crate::values::{PoolSettings, Secret};

pub const API_TITLE: &str = "NoM Natural Language Query API";
pub const API_VERSION: &str = "1.0.0";

/// The 'Configuration' type collects all the information necessary to serve queries at runtime.
///
/// Values of this type are produced from 'ServerOptions' using 'Configuration::from_options',
/// which checks everything that can be checked before touching the network.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub connection: DatabaseConnectionSettings,
    pub generation: GenerationSettings,
    pub limits: QueryLimits,
    pub server: ServerSettings,
}

/// How to reach the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub api_key: Secret,
    pub model: String,
    pub base_url: Url,
}

/// Resource bounds applied to every generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub statement_timeout: Duration,
    pub max_rows: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        QueryLimits {
            statement_timeout: Duration::from_secs(30),
            max_rows: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub port: u16,
    pub title: &'static str,
    pub version: &'static str,
}

impl Configuration {
    pub fn from_options(options: ServerOptions) -> Result<Configuration, ConfigurationError> {
        if options.database_url.0.is_empty() {
            return Err(ConfigurationError::MissingConnectionUri);
        }
        if options.openai_api_key.is_empty() {
            return Err(ConfigurationError::MissingApiKey);
        }
        if options.openai_model.trim().is_empty() {
            return Err(ConfigurationError::MissingModel);
        }
        if options.query_timeout_seconds == 0 {
            return Err(ConfigurationError::MustBePositive {
                name: "query timeout",
            });
        }
        if options.max_query_results == 0 {
            return Err(ConfigurationError::MustBePositive {
                name: "maximum query results",
            });
        }
        if options.pool_max_connections == 0 {
            return Err(ConfigurationError::MustBePositive {
                name: "pool maximum connections",
            });
        }
        if options.pool_min_connections > options.pool_max_connections {
            return Err(ConfigurationError::InvalidPoolBounds {
                min: options.pool_min_connections,
                max: options.pool_max_connections,
            });
        }

        let base_url = parse_base_url(&options.openai_base_url)?;

        Ok(Configuration {
            connection: DatabaseConnectionSettings {
                connection_uri: options.database_url,
                pool_settings: PoolSettings {
                    min_connections: options.pool_min_connections,
                    max_connections: options.pool_max_connections,
                    pool_timeout: options.pool_acquire_timeout_seconds,
                    ..PoolSettings::default()
                },
            },
            generation: GenerationSettings {
                api_key: options.openai_api_key,
                model: options.openai_model.trim().to_string(),
                base_url,
            },
            limits: QueryLimits {
                statement_timeout: Duration::from_secs(options.query_timeout_seconds),
                max_rows: options.max_query_results,
            },
            server: ServerSettings {
                port: options.port,
                title: API_TITLE,
                version: API_VERSION,
            },
        })
    }
}

/// Parse the base URL, making sure it ends in a slash so that joining
/// relative paths onto it keeps any path prefix (e.g. `/v1`).
fn parse_base_url(raw: &str) -> Result<Url, ConfigurationError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|err| ConfigurationError::InvalidBaseUrl {
        url: raw.to_string(),
        message: err.to_string(),
    })
}
