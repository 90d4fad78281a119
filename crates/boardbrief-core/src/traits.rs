use std::future::Future;

use crate::error::AppError;
use crate::models::{ExtractedText, Generation, ModelRequest, SourceDocument};

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;

    /// Fetch a page and keep its URL alongside the HTML.
    fn fetch_document(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<SourceDocument, AppError>> + Send {
        async move {
            let html = self.fetch(url).await?;
            Ok(SourceDocument::new(url, html))
        }
    }
}

/// Converts raw HTML into normalized plain text.
///
/// Best-effort: implementations never fail, malformed markup degrades to
/// whatever text can be recovered.
pub trait Cleaner: Send + Sync + Clone {
    fn clean(&self, html: &str) -> ExtractedText;
}

/// Text-generation service addressed by model identifier.
pub trait InferenceBackend: Send + Sync + Clone {
    fn generate(
        &self,
        request: ModelRequest<'_>,
    ) -> impl Future<Output = Result<Generation, AppError>> + Send;
}
