//! Scripted `CompletionService` for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionRequest, CompletionService, LlmError};

/// What the fake saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt: String,
    pub image_mime: Option<String>,
    pub image_len: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Replies are handed out in order; running out is reported as `EmptyContent`.
#[derive(Default)]
pub struct FakeCompletionService {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeCompletionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(text: &str) -> Self {
        let fake = Self::new();
        fake.push_reply(text);
        fake
    }

    pub fn failing(err: LlmError) -> Self {
        let fake = Self::new();
        fake.push_error(err);
        fake
    }

    pub fn push_reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn push_error(&self, err: LlmError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for FakeCompletionService {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            prompt: request.prompt.to_string(),
            image_mime: request.image.map(|i| i.mime_type.to_string()),
            image_len: request.image.map(|i| i.bytes.len()).unwrap_or(0),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        });

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}
