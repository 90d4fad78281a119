pub mod cleaner;
pub mod endpoint;
pub mod fetcher;
pub mod llm;
pub mod preload;

pub use cleaner::HtmlTextCleaner;
pub use endpoint::EndpointClient;
pub use fetcher::ReqwestFetcher;
pub use llm::OpenAiBackend;
