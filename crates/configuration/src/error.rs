//! Errors that can be thrown when interpreting the configuration.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("the database connection uri is empty; set it with --database-url or DATABASE_URL")]
    MissingConnectionUri,
    #[error("the generation api key is empty; set it with --openai-api-key or OPENAI_API_KEY")]
    MissingApiKey,
    #[error("the generation model identifier is empty")]
    MissingModel,
    #[error("invalid generation base url '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("{name} must be greater than zero")]
    MustBePositive { name: &'static str },
    #[error("pool minimum connections ({min}) exceeds maximum connections ({max})")]
    InvalidPoolBounds { min: u32, max: u32 },
}
