//! Errors raised while talking to the text generator.

use thiserror::Error;

/// The generator could not produce a usable completion.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to the generation service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("generation service returned an unreadable response: {0}")]
    Decode(String),
    #[error("generation service returned no content")]
    EmptyResponse,
}
