// Test doubles for the model call.
//
// MockGenerator replays queued replies in order and records every request,
// so generation flows can be tested without a network or an API key.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::generator::CopyGenerator;
use crate::request::CopyRequest;

pub struct MockGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<CopyRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A generator whose next call returns `raw`.
    pub fn replying(raw: impl Into<String>) -> Self {
        Self::new().then_reply(raw)
    }

    /// A generator whose next call fails with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self::new().then_fail(error)
    }

    pub fn then_reply(self, raw: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(raw.into()));
        self
    }

    pub fn then_fail(self, error: GenerationError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<CopyRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CopyGenerator for MockGenerator {
    async fn invoke(&self, request: &CopyRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("[]".to_string()))
    }
}
