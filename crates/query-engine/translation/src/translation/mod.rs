//! Turn a natural-language question into candidate SQL, and validated SQL back
//! into a natural-language explanation, with the help of a text generator.

pub mod error;
pub mod explanation;
pub mod generation;
pub mod prompt;

pub use error::GenerationError;
pub use explanation::{explain, FALLBACK_EXPLANATION};
pub use generation::{CompletionRequest, OpenAiClient, TextGenerator};
