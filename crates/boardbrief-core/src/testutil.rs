//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{ExtractedText, Generation, ModelRequest};
use crate::traits::{Cleaner, InferenceBackend};

pub fn generation(text: &str, input_tokens: u64, output_tokens: u64) -> Generation {
    Generation {
        text: text.to_string(),
        input_tokens,
        output_tokens,
    }
}

// ---------------------------------------------------------------------------
// MockCleaner
// ---------------------------------------------------------------------------

/// Mock cleaner that returns the input unchanged.
#[derive(Clone)]
pub struct MockCleaner;

impl Cleaner for MockCleaner {
    fn clean(&self, html: &str) -> ExtractedText {
        ExtractedText::new(html)
    }
}

// ---------------------------------------------------------------------------
// MockBackend
// ---------------------------------------------------------------------------

/// Mock inference backend with scripted replies per model.
///
/// Each call pops the next queued reply for its model. Models with nothing
/// queued fail with an "unknown model" error.
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<Mutex<HashMap<String, VecDeque<Result<Generation, AppError>>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    /// Model ids in the order their calls finished.
    completed: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, model: &str, generation: Generation) -> Self {
        self.push(model, Ok(generation))
    }

    /// Queue a non-retryable backend error.
    pub fn fail(self, model: &str, message: &str) -> Self {
        self.push(
            model,
            Err(AppError::LlmError {
                message: message.to_string(),
                status_code: 400,
                retryable: false,
            }),
        )
    }

    pub fn error(self, model: &str, error: AppError) -> Self {
        self.push(model, Err(error))
    }

    pub fn delay(self, model: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(model.to_string(), delay);
        self
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn push(self, model: &str, reply: Result<Generation, AppError>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(reply);
        self
    }
}

impl InferenceBackend for MockBackend {
    async fn generate(&self, request: ModelRequest<'_>) -> Result<Generation, AppError> {
        self.prompts
            .lock()
            .unwrap()
            .push(request.prompt.to_string());
        let delay = self.delays.lock().unwrap().get(request.model_id).copied();
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(request.model_id)
            .and_then(|queue| queue.pop_front());

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.completed
            .lock()
            .unwrap()
            .push(request.model_id.to_string());

        reply.unwrap_or_else(|| {
            Err(AppError::LlmError {
                message: format!("unknown model: {}", request.model_id),
                status_code: 404,
                retryable: false,
            })
        })
    }
}
