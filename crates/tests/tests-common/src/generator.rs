//! A scripted stand-in for the text-generation service.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use query_engine_translation::translation::{CompletionRequest, GenerationError, TextGenerator};

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    /// The service answers with this HTTP status.
    Fail(u16),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }
}

/// Hands out its replies in order, one per request, and remembers every request.
/// Once the script runs out every request fails with an empty response.
#[derive(Debug, Default)]
pub struct StubGenerator {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubGenerator {
    pub fn replying(replies: impl IntoIterator<Item = Reply>) -> Self {
        StubGenerator {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    /// A generator producing `sql`, then explaining it with `explanation`.
    pub fn sql_then_explanation(sql: &str, explanation: &str) -> Self {
        StubGenerator::replying([Reply::text(sql), Reply::text(explanation)])
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(status)) => Err(GenerationError::Api {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Err(GenerationError::EmptyResponse),
        }
    }
}
