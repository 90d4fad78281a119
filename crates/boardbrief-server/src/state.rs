use boardbrief_client::{HtmlTextCleaner, OpenAiBackend};
use boardbrief_core::compare::DEFAULT_RETRY_MAX_DELAY;
use boardbrief_core::{AppError, Comparator, SummarizeService};

use crate::config::ServerConfig;

pub type Summarizer = SummarizeService<HtmlTextCleaner, OpenAiBackend>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub service: Summarizer,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Wire the extraction and comparison pipeline from configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, AppError> {
        let backend = OpenAiBackend::with_base_url(&config.api_key, &config.base_url)?
            .with_timeout(config.call_timeout)?;

        let comparator = Comparator::new(backend, config.models.clone())
            .with_call_timeout(config.call_timeout)
            .with_fan_out(config.fan_out)
            .with_max_attempts(config.max_attempts)
            .with_retry_backoff(config.retry_base_delay, DEFAULT_RETRY_MAX_DELAY);

        let service = SummarizeService::new(HtmlTextCleaner::new(), comparator)
            .with_min_text_chars(config.min_text_chars);

        Ok(Self {
            service,
            max_body_bytes: config.max_body_bytes,
        })
    }
}
