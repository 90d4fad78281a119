use std::time::{Duration, Instant};

use futures::future::join_all;

use crate::error::AppError;
use crate::models::{ComparisonReport, ExtractedText, GenerationParams, ModelRequest, ModelResult};
use crate::prompt::PromptTemplate;
use crate::traits::InferenceBackend;

/// Per-call budget when none is configured.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Wait before the first retry; doubles on each further attempt.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on the wait between two attempts.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// How the per-model calls are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// One call after another, in configured order.
    Sequential,
    /// All calls in flight at once.
    #[default]
    Concurrent,
}

/// Sends the same prompt to every configured model and collects the outcomes.
///
/// A failing model never aborts the run: its entry in the report becomes a
/// failure marker and the remaining models are still called. The report keeps
/// the configured model order whatever order the calls complete in.
#[derive(Clone)]
pub struct Comparator<B: InferenceBackend> {
    backend: B,
    models: Vec<String>,
    prompt: PromptTemplate,
    params: GenerationParams,
    call_timeout: Duration,
    fan_out: FanOut,
    max_attempts: u32,
    retry_base_delay: Duration,
    retry_max_delay: Duration,
}

impl<B: InferenceBackend> Comparator<B> {
    pub fn new(backend: B, models: Vec<String>) -> Self {
        Self {
            backend,
            models,
            prompt: PromptTemplate::default(),
            params: GenerationParams::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
            fan_out: FanOut::default(),
            max_attempts: 1,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            retry_max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    /// Total attempts per model, counting the first. Only retryable errors
    /// (see [`AppError::is_retryable`]) are tried again.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Backoff between attempts: `base` before the first retry, doubling
    /// after that, never more than `max`.
    pub fn with_retry_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.retry_base_delay = base;
        self.retry_max_delay = max.max(base);
        self
    }

    /// Wait before retry number `retry` (1 for the first retry).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.retry_base_delay
            .saturating_mul(factor)
            .min(self.retry_max_delay)
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Run every configured model against `text`.
    pub async fn compare(&self, text: &ExtractedText) -> ComparisonReport {
        let prompt = self.prompt.render(text);
        tracing::info!(
            models = self.models.len(),
            chars = text.char_count(),
            fan_out = ?self.fan_out,
            "Comparing models"
        );

        let results = match self.fan_out {
            FanOut::Sequential => {
                let mut results = Vec::with_capacity(self.models.len());
                for model_id in &self.models {
                    results.push(self.run_model(model_id, &prompt).await);
                }
                results
            }
            // join_all yields outputs by input position, not completion order.
            FanOut::Concurrent => {
                join_all(
                    self.models
                        .iter()
                        .map(|model_id| self.run_model(model_id, &prompt)),
                )
                .await
            }
        };

        let report = ComparisonReport {
            text_length: text.char_count(),
            models_compared: self.models.len(),
            results,
        };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Comparison complete"
        );
        report
    }

    async fn run_model(&self, model_id: &str, prompt: &str) -> ModelResult {
        let request = ModelRequest {
            model_id,
            prompt,
            params: self.params,
        };

        tracing::info!(model = %model_id, "Invoking model");
        let started = Instant::now();
        let mut attempt = 1;
        let outcome = loop {
            let outcome =
                match tokio::time::timeout(self.call_timeout, self.backend.generate(request)).await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(AppError::Timeout(self.call_timeout)),
                };

            match outcome {
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.delay_for_retry(attempt);
                    tracing::warn!(
                        model = %model_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Model call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => break other,
            }
        };
        let latency = started.elapsed().as_secs_f64();

        match outcome {
            Ok(generation) => {
                tracing::info!(
                    model = %model_id,
                    latency_seconds = latency,
                    input_tokens = generation.input_tokens,
                    output_tokens = generation.output_tokens,
                    "Model call succeeded"
                );
                ModelResult::success(model_id, generation, latency)
            }
            Err(e) => {
                tracing::warn!(model = %model_id, latency_seconds = latency, error = %e, "Model call failed");
                ModelResult::failure(model_id, e.to_string(), latency)
            }
        }
    }
}
