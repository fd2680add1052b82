//! Command-line and environment options for the server.

use clap::Parser;

use crate::connection_settings::DEFAULT_CONNECTION_URI_VARIABLE;
use crate::values::{ConnectionUri, Secret};

pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Options for the natural-language query server.
///
/// Every option can also be supplied through the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "nom-nlq", version, about = "NoM Natural Language Query API")]
pub struct ServerOptions {
    /// Connection string for the indexer database.
    #[arg(long, env = DEFAULT_CONNECTION_URI_VARIABLE, hide_env_values = true)]
    pub database_url: ConnectionUri,

    /// API key for the text-generation service.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Secret,

    /// Model identifier used for SQL generation and explanations.
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub openai_model: String,

    /// Base URL of an OpenAI-compatible chat completions API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Per-statement execution timeout.
    #[arg(long, env = "QUERY_TIMEOUT_SECONDS", default_value_t = 30)]
    pub query_timeout_seconds: u64,

    /// Maximum number of rows returned for one question.
    #[arg(long, env = "MAX_QUERY_RESULTS", default_value_t = 1000)]
    pub max_query_results: usize,

    #[arg(long, env = "POOL_MIN_CONNECTIONS", default_value_t = 10)]
    pub pool_min_connections: u32,

    #[arg(long, env = "POOL_MAX_CONNECTIONS", default_value_t = 20)]
    pub pool_max_connections: u32,

    /// How long a request waits for a free connection before giving up.
    #[arg(long, env = "POOL_ACQUIRE_TIMEOUT_SECONDS", default_value_t = 30)]
    pub pool_acquire_timeout_seconds: u64,

    /// Port for the HTTP server.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,
}
