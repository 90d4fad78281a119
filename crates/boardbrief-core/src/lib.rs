pub mod compare;
pub mod error;
pub mod models;
pub mod prompt;
pub mod summarize;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use compare::{Comparator, FanOut};
pub use error::AppError;
pub use models::{
    ComparisonReport, ExtractedText, Generation, GenerationParams, ModelMetrics, ModelRequest,
    ModelResult, SourceDocument,
};
pub use prompt::PromptTemplate;
pub use summarize::SummarizeService;
pub use traits::{Cleaner, Fetcher, InferenceBackend};
