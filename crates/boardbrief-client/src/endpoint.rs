use std::time::Duration;

use boardbrief_core::error::AppError;
use boardbrief_core::models::ComparisonReport;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

/// Model fan-out can take minutes on the server side.
const DEFAULT_ENDPOINT_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for a remote `/summarize` endpoint.
///
/// Sends raw page HTML and decodes the comparison report the server returns.
#[derive(Clone)]
pub struct EndpointClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: Option<String>,
}

impl EndpointClient {
    pub fn new(endpoint: &str) -> Result<Self, AppError> {
        Self::with_timeout(endpoint, DEFAULT_ENDPOINT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post `html` and wait for the comparison report.
    pub async fn summarize(&self, html: &str) -> Result<ComparisonReport, AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(html.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout)
                } else if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {e}"))
                } else {
                    AppError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(endpoint_error(status.as_u16(), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn endpoint_error(status: u16, body: &str) -> AppError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody { error, .. }) if !error.is_empty() => error,
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body.trim().to_string(),
    };
    AppError::EndpointError { status, message }
}
