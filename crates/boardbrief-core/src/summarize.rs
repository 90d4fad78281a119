use crate::compare::Comparator;
use crate::error::AppError;
use crate::models::ComparisonReport;
use crate::traits::{Cleaner, InferenceBackend};

/// Documents whose extracted text is shorter than this are rejected.
pub const DEFAULT_MIN_TEXT_CHARS: usize = 100;

/// Orchestrates the server-side pipeline: extract → check → compare.
///
/// Generic over the cleaner and backend so the whole flow can be exercised
/// without real HTTP or model calls.
#[derive(Clone)]
pub struct SummarizeService<C, B>
where
    C: Cleaner,
    B: InferenceBackend,
{
    cleaner: C,
    comparator: Comparator<B>,
    min_text_chars: usize,
}

impl<C, B> SummarizeService<C, B>
where
    C: Cleaner,
    B: InferenceBackend,
{
    pub fn new(cleaner: C, comparator: Comparator<B>) -> Self {
        Self {
            cleaner,
            comparator,
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
        }
    }

    pub fn with_min_text_chars(mut self, min: usize) -> Self {
        self.min_text_chars = min;
        self
    }

    pub fn comparator(&self) -> &Comparator<B> {
        &self.comparator
    }

    /// Extract text from `html` and compare every configured model on it.
    ///
    /// Fails only when the page yields too little text; individual model
    /// failures are reported inside the returned report.
    pub async fn summarize(&self, html: &str) -> Result<ComparisonReport, AppError> {
        tracing::info!("Received {} bytes of HTML", html.len());

        let text = self.cleaner.clean(html);
        tracing::info!(chars = text.char_count(), "Extracted text");

        if text.char_count() < self.min_text_chars {
            return Err(AppError::InsufficientContent {
                chars: text.char_count(),
                min: self.min_text_chars,
            });
        }

        Ok(self.comparator.compare(&text).await)
    }
}
