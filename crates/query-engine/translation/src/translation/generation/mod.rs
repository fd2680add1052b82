//! The seam between the pipeline and whatever produces text for it.

mod openai;

use async_trait::async_trait;

pub use openai::OpenAiClient;

use super::error::GenerationError;

/// One system/user exchange with a text generator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Something that completes a prompt. Implementations must be shareable across
/// concurrent requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the raw completion text. Implementations should not post-process it.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        (**self).complete(request).await
    }
}
